//! Pull-based rule evaluator
//!
//! Each relation named in a rule body is backed by a [`Stream`] produced by a
//! factory registered in the [`Context`]. A stream sees the clause's slots
//! through the [`Heap`]: bound addresses are inputs, writable ones are filled
//! on every successful [`Stream::advance`].
//!
//! Conjunctions are evaluated as nested loops with backtracking: literal `i+1`
//! gets a fresh stream every time literal `i` produces a binding, so a stream
//! is never rewound or shared. Tuples are emitted as they are found; rules
//! sharing the goal are run one after another and their tuples concatenated.

use crate::query::compiler::{Call, Clause, Machine};
use crate::rdf::Term;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Evaluation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Relation has no registered stream factory
    #[error("No stream registered for relation: {0}")]
    UnknownRelation(String),

    /// Literal arity does not match the registered relation
    #[error("Relation {relation} takes {expected} arguments, got {found}")]
    ArityMismatch {
        relation: String,
        expected: usize,
        found: usize,
    },

    /// Slot read before anything wrote it
    #[error("Slot {0} read before it was bound")]
    UnboundSlot(usize),

    /// Stream-specific failure
    #[error("Stream error: {0}")]
    Stream(String),
}

pub type VmResult<T> = Result<T, VmError>;

/// Position of a literal argument in the clause heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Addr {
    pub slot: usize,
    writable: bool,
}

impl Addr {
    /// Slot the stream fills on each step
    pub fn free(slot: usize) -> Self {
        Self {
            slot,
            writable: true,
        }
    }

    /// Slot holding a value supplied by the caller
    pub fn bound(slot: usize) -> Self {
        Self {
            slot,
            writable: false,
        }
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

/// Variable bindings of one clause
#[derive(Debug, Clone, Default)]
pub struct Heap {
    slots: Vec<Option<Term>>,
}

impl Heap {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn get(&self, slot: usize) -> VmResult<&Term> {
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .ok_or(VmError::UnboundSlot(slot))
    }

    pub fn put(&mut self, slot: usize, term: Term) -> VmResult<()> {
        let cell = self.slots.get_mut(slot).ok_or(VmError::UnboundSlot(slot))?;
        *cell = Some(term);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Outcome of one [`Stream::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Writable slots now hold the next match
    Bound,
    /// No further matches; normal termination
    EndOfStream,
}

/// Single-literal cursor over some relation
pub trait Stream {
    fn advance(&mut self, heap: &mut Heap) -> VmResult<Step>;
}

/// Builds a stream for one literal given its argument addresses
pub type StreamFactory<'s> = Box<dyn Fn(&[Addr]) -> VmResult<Box<dyn Stream + 's>> + 's>;

struct Registration<'s> {
    arity: usize,
    factory: StreamFactory<'s>,
}

/// Relations available to an evaluation
#[derive(Default)]
pub struct Context<'s> {
    relations: FxHashMap<String, Registration<'s>>,
}

impl<'s> Context<'s> {
    pub fn new() -> Self {
        Self {
            relations: FxHashMap::default(),
        }
    }

    /// Register the stream factory backing `relation`
    pub fn add(mut self, relation: impl Into<String>, arity: usize, factory: StreamFactory<'s>) -> Self {
        self.relations
            .insert(relation.into(), Registration { arity, factory });
        self
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.relations.contains_key(relation)
    }

    fn open(&self, call: &Call) -> VmResult<Box<dyn Stream + 's>> {
        let registration = self
            .relations
            .get(&call.relation)
            .ok_or_else(|| VmError::UnknownRelation(call.relation.clone()))?;
        (registration.factory)(&call.addrs)
    }

    fn check(&self, machine: &Machine) -> VmResult<()> {
        for call in machine.clauses.iter().flat_map(|c| c.calls.iter()) {
            let registration = self
                .relations
                .get(&call.relation)
                .ok_or_else(|| VmError::UnknownRelation(call.relation.clone()))?;
            if registration.arity != call.addrs.len() {
                return Err(VmError::ArityMismatch {
                    relation: call.relation.clone(),
                    expected: registration.arity,
                    found: call.addrs.len(),
                });
            }
        }
        Ok(())
    }
}

/// Result row, one term per goal argument
pub type Tuple = Vec<Term>;

/// Lazily evaluates a compiled machine; yields one tuple per derivation
pub struct Evaluation<'m, 's> {
    machine: &'m Machine,
    context: &'m Context<'s>,
    clause: usize,
    heap: Heap,
    streams: Vec<Box<dyn Stream + 's>>,
    started: bool,
    done: bool,
}

impl<'m, 's> Evaluation<'m, 's> {
    /// Check that every relation the machine calls is registered
    pub fn new(machine: &'m Machine, context: &'m Context<'s>) -> VmResult<Self> {
        context.check(machine)?;
        Ok(Self {
            machine,
            context,
            clause: 0,
            heap: Heap::default(),
            streams: Vec::new(),
            started: false,
            done: machine.clauses.is_empty(),
        })
    }

    fn enter_clause(&mut self, clause: &Clause) -> VmResult<()> {
        self.heap = Heap::new(clause.slots);
        for (slot, term) in &clause.constants {
            self.heap.put(*slot, term.clone())?;
        }
        self.streams.clear();
        if let Some(call) = clause.calls.first() {
            self.streams.push(self.context.open(call)?);
        }
        self.started = true;
        Ok(())
    }

    fn next_clause(&mut self) {
        self.clause += 1;
        self.started = false;
        self.streams.clear();
        if self.clause >= self.machine.clauses.len() {
            self.done = true;
        }
    }

    fn project(&self, clause: &Clause) -> VmResult<Tuple> {
        clause
            .head
            .iter()
            .map(|slot| self.heap.get(*slot).cloned())
            .collect()
    }

    fn satisfied(&self, call: &Call) -> VmResult<bool> {
        for (a, b) in &call.equalities {
            if self.heap.get(*a)? != self.heap.get(*b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn step(&mut self) -> VmResult<Option<Tuple>> {
        let machine = self.machine;
        while !self.done {
            let clause = &machine.clauses[self.clause];

            if !self.started {
                self.enter_clause(clause)?;
                if clause.calls.is_empty() {
                    let tuple = self.project(clause)?;
                    self.next_clause();
                    return Ok(Some(tuple));
                }
            }

            let depth = match self.streams.len().checked_sub(1) {
                Some(depth) => depth,
                None => {
                    self.next_clause();
                    continue;
                }
            };

            match self.streams[depth].advance(&mut self.heap)? {
                Step::EndOfStream => {
                    self.streams.pop();
                }
                Step::Bound => {
                    let call = &clause.calls[depth];
                    if !self.satisfied(call)? {
                        continue;
                    }
                    match clause.calls.get(depth + 1) {
                        Some(next) => {
                            let stream = self.context.open(next)?;
                            self.streams.push(stream);
                        }
                        None => return Ok(Some(self.project(clause)?)),
                    }
                }
            }
        }
        Ok(None)
    }
}

impl Iterator for Evaluation<'_, '_> {
    type Item = VmResult<Tuple>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(Some(tuple)) => Some(Ok(tuple)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compiler::compile;
    use crate::query::parser::parse_program;
    use crate::rdf::Literal;

    /// Binary relation over an in-memory list of pairs
    struct PairStream {
        rows: Vec<(Term, Term)>,
        addrs: Vec<Addr>,
        key: Option<Vec<Option<Term>>>,
        pos: usize,
    }

    impl Stream for PairStream {
        fn advance(&mut self, heap: &mut Heap) -> VmResult<Step> {
            if self.key.is_none() {
                let key = self
                    .addrs
                    .iter()
                    .map(|a| {
                        if a.is_writable() {
                            Ok(None)
                        } else {
                            heap.get(a.slot).cloned().map(Some)
                        }
                    })
                    .collect::<VmResult<Vec<_>>>()?;
                self.key = Some(key);
            }
            let key = self.key.as_ref().unwrap();

            while self.pos < self.rows.len() {
                let (a, b) = self.rows[self.pos].clone();
                self.pos += 1;
                let row = [a, b];
                if key
                    .iter()
                    .zip(row.iter())
                    .all(|(k, v)| k.as_ref().map_or(true, |k| k == v))
                {
                    for (addr, value) in self.addrs.iter().zip(row) {
                        if addr.is_writable() {
                            heap.put(addr.slot, value)?;
                        }
                    }
                    return Ok(Step::Bound);
                }
            }
            Ok(Step::EndOfStream)
        }
    }

    fn lit(s: &str) -> Term {
        Literal::new_simple_literal(s).into()
    }

    fn edges<'s>(rows: Vec<(&str, &str)>) -> StreamFactory<'s> {
        let rows: Vec<(Term, Term)> = rows.into_iter().map(|(a, b)| (lit(a), lit(b))).collect();
        Box::new(move |addrs: &[Addr]| {
            Ok(Box::new(PairStream {
                rows: rows.clone(),
                addrs: addrs.to_vec(),
                key: None,
                pos: 0,
            }) as Box<dyn Stream>)
        })
    }

    fn run(text: &str, context: &Context<'_>) -> Vec<Vec<String>> {
        let program = parse_program(text).unwrap();
        let machine = compile(&program, "q").unwrap();
        Evaluation::new(&machine, context)
            .unwrap()
            .map(|t| t.unwrap().iter().map(|x| x.as_str().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_join_two_literals() {
        let context = Context::new().add("e", 2, edges(vec![("a", "b"), ("b", "c"), ("b", "d")]));
        let rows = run("e(x, y). q(x, z) :- e(x, y), e(y, z).", &context);
        assert_eq!(rows, vec![vec!["a", "c"], vec!["a", "d"]]);
    }

    #[test]
    fn test_bag_semantics_keeps_duplicates() {
        let context = Context::new().add("e", 2, edges(vec![("a", "b"), ("a", "c")]));
        let rows = run("e(x, y). q(x) :- e(x, y).", &context);
        assert_eq!(rows, vec![vec!["a"], vec!["a"]]);
    }

    #[test]
    fn test_rules_sharing_goal_are_concatenated() {
        let context = Context::new().add("e", 2, edges(vec![("a", "b")]));
        let rows = run("e(x, y). q(x) :- e(x, y). q(y) :- e(x, y).", &context);
        assert_eq!(rows, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_repeated_variable_is_equality() {
        let context = Context::new().add("e", 2, edges(vec![("a", "a"), ("a", "b"), ("c", "c")]));
        let rows = run("e(x, y). q(x) :- e(x, x).", &context);
        assert_eq!(rows, vec![vec!["a"], vec!["c"]]);
    }

    #[test]
    fn test_empty_relation() {
        let context = Context::new().add("e", 2, edges(vec![]));
        assert!(run("e(x, y). q(x) :- e(x, y), e(y, x).", &context).is_empty());
    }

    #[test]
    fn test_unregistered_relation() {
        let program = parse_program("e(x, y). q(x) :- e(x, y).").unwrap();
        let machine = compile(&program, "q").unwrap();
        let context = Context::new();
        assert!(matches!(
            Evaluation::new(&machine, &context),
            Err(VmError::UnknownRelation(_))
        ));
    }

    #[test]
    fn test_registered_arity_mismatch() {
        let program = parse_program("e(x, y). q(x) :- e(x, y).").unwrap();
        let machine = compile(&program, "q").unwrap();
        let context = Context::new().add("e", 3, edges(vec![]));
        assert!(matches!(
            Evaluation::new(&machine, &context),
            Err(VmError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_heap_unbound_read() {
        let heap = Heap::new(2);
        assert_eq!(heap.get(1), Err(VmError::UnboundSlot(1)));
        assert_eq!(heap.get(5), Err(VmError::UnboundSlot(5)));
    }
}

//! Triple-pattern stream bridge
//!
//! Backs a ternary relation `f(S, P, O)` with a [`TripleStore`]. One
//! [`PatternStream`] serves exactly one literal on one evaluation path:
//!
//! - the first `advance` reads the bound slots, opens a cursor on the
//!   partial pattern and reads the first match
//! - every later `advance` reads the next match
//! - once the cursor is drained the stream stays exhausted
//!
//! Matches are written into the free slots only. Join ordering across
//! literals belongs to the evaluator.

use crate::query::vm::{Addr, Heap, Step, Stream, StreamFactory, VmError, VmResult};
use crate::rdf::{NamedNode, Term, Triple, TripleCursor, TriplePattern, TripleStore};

/// Arity of the store-backed relation
pub const TRIPLE_ARITY: usize = 3;

enum State<'s> {
    Uninitialized,
    Active(TripleCursor<'s>),
    Exhausted,
}

/// Cursor adapter for a single `f(S, P, O)` literal
pub struct PatternStream<'s, S: TripleStore + ?Sized> {
    store: &'s S,
    addrs: [Addr; TRIPLE_ARITY],
    state: State<'s>,
}

impl<'s, S: TripleStore + ?Sized> PatternStream<'s, S> {
    pub fn new(store: &'s S, addrs: [Addr; TRIPLE_ARITY]) -> Self {
        Self {
            store,
            addrs,
            state: State::Uninitialized,
        }
    }

    /// Pattern built from the bound slots; `None` if a bound subject or
    /// predicate is a literal, which no triple can match
    fn pattern(&self, heap: &Heap) -> VmResult<Option<TriplePattern>> {
        let [s, p, o] = self.addrs;
        let subject = match bound_value(heap, s)? {
            Some(term) => match term.as_named_node() {
                Some(node) => Some(node.clone()),
                None => return Ok(None),
            },
            None => None,
        };
        let predicate = match bound_value(heap, p)? {
            Some(term) => match term.as_named_node() {
                Some(node) => Some(node.clone()),
                None => return Ok(None),
            },
            None => None,
        };
        let object = bound_value(heap, o)?.cloned();
        Ok(Some(TriplePattern::new(subject, predicate, object)))
    }

    fn bind(&self, heap: &mut Heap, triple: &Triple) -> VmResult<()> {
        let [s, p, o] = self.addrs;
        if s.is_writable() {
            heap.put(s.slot, named(&triple.subject))?;
        }
        if p.is_writable() {
            heap.put(p.slot, named(&triple.predicate))?;
        }
        if o.is_writable() {
            heap.put(o.slot, triple.object.clone())?;
        }
        Ok(())
    }
}

impl<'s, S: TripleStore + ?Sized> Stream for PatternStream<'s, S> {
    fn advance(&mut self, heap: &mut Heap) -> VmResult<Step> {
        if matches!(self.state, State::Uninitialized) {
            self.state = match self.pattern(heap)? {
                Some(pattern) => State::Active(self.store.match_pattern(&pattern)),
                None => State::Exhausted,
            };
        }

        let next = match &mut self.state {
            State::Active(cursor) => cursor.next(),
            _ => None,
        };

        match next {
            Some(triple) => {
                self.bind(heap, triple)?;
                Ok(Step::Bound)
            }
            None => {
                self.state = State::Exhausted;
                Ok(Step::EndOfStream)
            }
        }
    }
}

fn bound_value(heap: &Heap, addr: Addr) -> VmResult<Option<&Term>> {
    if addr.is_writable() {
        Ok(None)
    } else {
        heap.get(addr.slot).map(Some)
    }
}

fn named(node: &NamedNode) -> Term {
    Term::NamedNode(node.clone())
}

/// Stream factory serving `f(S, P, O)` literals from `store`
pub fn pattern_streams<'s, S>(store: &'s S) -> StreamFactory<'s>
where
    S: TripleStore + ?Sized,
{
    Box::new(move |addrs: &[Addr]| {
        let addrs: [Addr; TRIPLE_ARITY] =
            addrs.try_into().map_err(|_| VmError::ArityMismatch {
                relation: "triple pattern".to_string(),
                expected: TRIPLE_ARITY,
                found: addrs.len(),
            })?;
        Ok(Box::new(PatternStream::new(store, addrs)) as Box<dyn Stream + 's>)
    })
}

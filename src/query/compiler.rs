//! Rule compiler
//!
//! Lowers the rules defining a goal into [`Clause`]s: every argument of every
//! body literal gets a heap slot, and each literal becomes a [`Call`] whose
//! addresses say which slots the literal reads and which it fills.
//!
//! Slot assignment, per clause, walking the body left to right:
//! - constant: pre-filled slot, bound
//! - `_`: fresh slot, free
//! - first occurrence of a variable: fresh slot, free
//! - variable seen in an earlier literal: that slot, bound
//! - variable seen earlier in the same literal: fresh slot, free, plus an
//!   equality check against the first occurrence

use crate::query::ast::{Arg, Atom, Program, Rule};
use crate::query::vm::Addr;
use crate::rdf::Term;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Compilation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// No rule has the goal as its head
    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    /// Body literal names neither a declared relation nor a rule
    #[error("Unknown relation: {0}")]
    UnknownRelation(String),

    /// Literal or head arity differs from its declaration
    #[error("Arity mismatch for {relation}: expected {expected}, found {found}")]
    ArityMismatch {
        relation: String,
        expected: usize,
        found: usize,
    },

    /// Head variable does not occur in the body
    #[error("Head variable {variable} of {rule} is not bound by the body")]
    UnboundHeadVariable { rule: String, variable: String },

    /// Body literal refers to a rule-defined relation
    #[error("Derived relation {0} cannot appear in a rule body")]
    DerivedLiteral(String),

    /// Relation declaration with a non-variable argument
    #[error("Relation declaration must use variables only: {0}")]
    GroundFact(String),
}

pub type CompileResult<T> = Result<T, CompileError>;

/// One body literal, ready to be bound to a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub relation: String,
    pub addrs: Vec<Addr>,
    /// Slot pairs that must hold equal terms after each step
    pub equalities: Vec<(usize, usize)>,
}

/// One compiled rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Heap size
    pub slots: usize,
    /// Slots filled before evaluation starts
    pub constants: Vec<(usize, Term)>,
    pub calls: Vec<Call>,
    /// Slots projected into each result tuple
    pub head: Vec<usize>,
}

/// Compiled goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    pub goal: String,
    pub arity: usize,
    pub clauses: Vec<Clause>,
    /// Declared relations with their arity
    pub relations: Vec<(String, usize)>,
}

/// Compile every rule whose head is `goal`
pub fn compile(program: &Program, goal: &str) -> CompileResult<Machine> {
    let mut relations = Vec::with_capacity(program.facts.len());
    for fact in &program.facts {
        if fact.args.iter().any(|a| a.as_var().is_none()) {
            return Err(CompileError::GroundFact(fact.to_string()));
        }
        relations.push((fact.relation.clone(), fact.arity()));
    }

    let mut arity = None;
    let mut clauses = Vec::new();
    for rule in program.rules_for(goal) {
        let expected = *arity.get_or_insert(rule.head.arity());
        if rule.head.arity() != expected {
            return Err(CompileError::ArityMismatch {
                relation: goal.to_string(),
                expected,
                found: rule.head.arity(),
            });
        }
        clauses.push(compile_rule(program, &relations, rule)?);
    }

    let arity = arity.ok_or_else(|| CompileError::GoalNotFound(goal.to_string()))?;
    Ok(Machine {
        goal: goal.to_string(),
        arity,
        clauses,
        relations,
    })
}

#[derive(Default)]
struct SlotAllocator {
    next: usize,
    constants: Vec<(usize, Term)>,
    /// variable -> (slot, index of the literal that first bound it)
    vars: FxHashMap<String, (usize, usize)>,
}

impl SlotAllocator {
    fn fresh(&mut self) -> usize {
        let slot = self.next;
        self.next += 1;
        slot
    }

    fn constant(&mut self, term: &Term) -> usize {
        let slot = self.fresh();
        self.constants.push((slot, term.clone()));
        slot
    }
}

fn compile_rule(program: &Program, relations: &[(String, usize)], rule: &Rule) -> CompileResult<Clause> {
    let mut alloc = SlotAllocator::default();
    let mut calls = Vec::with_capacity(rule.body.len());

    for (index, literal) in rule.body.iter().enumerate() {
        check_literal(program, relations, literal)?;

        let mut addrs = Vec::with_capacity(literal.arity());
        let mut equalities = Vec::new();
        for arg in &literal.args {
            let addr = match arg {
                Arg::Const(term) => Addr::bound(alloc.constant(term)),
                Arg::Var(_) if arg.is_wildcard() => Addr::free(alloc.fresh()),
                Arg::Var(name) => match alloc.vars.get(name).copied() {
                    None => {
                        let slot = alloc.fresh();
                        alloc.vars.insert(name.clone(), (slot, index));
                        Addr::free(slot)
                    }
                    Some((slot, bound_in)) if bound_in < index => Addr::bound(slot),
                    Some((first, _)) => {
                        let slot = alloc.fresh();
                        equalities.push((slot, first));
                        Addr::free(slot)
                    }
                },
            };
            addrs.push(addr);
        }

        calls.push(Call {
            relation: literal.relation.clone(),
            addrs,
            equalities,
        });
    }

    let mut head = Vec::with_capacity(rule.head.arity());
    for arg in &rule.head.args {
        let slot = match arg {
            Arg::Const(term) => alloc.constant(term),
            Arg::Var(name) => match alloc.vars.get(name) {
                Some((slot, _)) if !arg.is_wildcard() => *slot,
                _ => {
                    return Err(CompileError::UnboundHeadVariable {
                        rule: rule.head.to_string(),
                        variable: name.clone(),
                    })
                }
            },
        };
        head.push(slot);
    }

    Ok(Clause {
        slots: alloc.next,
        constants: alloc.constants,
        calls,
        head,
    })
}

fn check_literal(program: &Program, relations: &[(String, usize)], literal: &Atom) -> CompileResult<()> {
    if program.is_derived(&literal.relation) {
        return Err(CompileError::DerivedLiteral(literal.relation.clone()));
    }
    let (_, expected) = relations
        .iter()
        .find(|(name, _)| *name == literal.relation)
        .ok_or_else(|| CompileError::UnknownRelation(literal.relation.clone()))?;
    if *expected != literal.arity() {
        return Err(CompileError::ArityMismatch {
            relation: literal.relation.clone(),
            expected: *expected,
            found: literal.arity(),
        });
    }
    Ok(())
}

//! Rule-based query processing
//!
//! Queries are small rule programs:
//!
//! ```text
//! f(s, p, o).
//! q(x) :- f(x, ub:memberOf, <edu:University0.Department0>),
//!         f(x, rdf:type, ub:UndergraduateStudent).
//! ```
//!
//! The program is parsed with Pest, the rules for the goal are compiled to
//! slot-addressed clauses, and the evaluator pulls bindings from one
//! [`PatternStream`](crate::adapter::PatternStream) per body literal.
//! Every declared relation is served by the triple store.

pub mod ast;
pub mod compiler;
pub mod parser;
pub mod vm;

pub use ast::{Arg, Atom, Program, Rule};
pub use compiler::{compile, Call, Clause, CompileError, CompileResult, Machine};
pub use parser::{parse_program, ParseError, ParseResult};
pub use vm::{
    Addr, Context, Evaluation, Heap, Step, Stream, StreamFactory, Tuple, VmError, VmResult,
};

use crate::adapter::{pattern_streams, TRIPLE_ARITY};
use crate::rdf::TripleStore;
use thiserror::Error;

/// Default goal relation
pub const DEFAULT_GOAL: &str = "q";

/// Query errors
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Vm(#[from] VmError),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Query engine - parses, compiles and evaluates rule programs against a store
#[derive(Debug, Clone)]
pub struct QueryEngine {
    goal: String,
}

impl QueryEngine {
    /// Create a new query engine evaluating the default goal
    pub fn new() -> Self {
        Self {
            goal: DEFAULT_GOAL.to_string(),
        }
    }

    /// Evaluate `goal` instead of the default
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Parse and compile a query text
    pub fn prepare(&self, text: &str) -> QueryResult<Machine> {
        let program = parse_program(text)?;
        Ok(compile(&program, &self.goal)?)
    }

    /// Relations of `machine` bound to `store`
    pub fn context<'s, S>(&self, machine: &Machine, store: &'s S) -> QueryResult<Context<'s>>
    where
        S: TripleStore + ?Sized,
    {
        let mut context = Context::new();
        for (relation, arity) in &machine.relations {
            if *arity != TRIPLE_ARITY {
                return Err(VmError::ArityMismatch {
                    relation: relation.clone(),
                    expected: TRIPLE_ARITY,
                    found: *arity,
                }
                .into());
            }
            context = context.add(relation.clone(), TRIPLE_ARITY, pattern_streams(store));
        }
        Ok(context)
    }

    /// Run a query text to completion
    pub fn execute<S>(&self, text: &str, store: &S) -> QueryResult<Vec<Tuple>>
    where
        S: TripleStore + ?Sized,
    {
        let machine = self.prepare(text)?;
        let context = self.context(&machine, store)?;
        let rows = Evaluation::new(&machine, &context)?.collect::<VmResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// Number of result tuples, without materialising them
    pub fn count<S>(&self, text: &str, store: &S) -> QueryResult<usize>
    where
        S: TripleStore + ?Sized,
    {
        let machine = self.prepare(text)?;
        let context = self.context(&machine, store)?;
        let mut count = 0;
        for row in Evaluation::new(&machine, &context)? {
            row?;
            count += 1;
        }
        Ok(count)
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

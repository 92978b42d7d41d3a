//! Abstract syntax tree for rule programs
//!
//! A program is a list of relation declarations (`f(s, p, o).`) and Horn
//! rules (`q(x) :- f(x, p, y), f(y, p2, z).`), kept in source order.

use crate::rdf::Term;
use std::fmt;

/// Anonymous variable; every occurrence is distinct
pub const WILDCARD: &str = "_";

/// Literal argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Named variable
    Var(String),
    /// Constant: a reference or a string literal
    Const(Term),
}

impl Arg {
    pub fn var(name: impl Into<String>) -> Self {
        Arg::Var(name.into())
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            Arg::Var(name) => Some(name),
            Arg::Const(_) => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Arg::Var(name) if name == WILDCARD)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Var(name) => f.write_str(name),
            Arg::Const(term) => write!(f, "{}", term),
        }
    }
}

/// `relation(arg, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub relation: String,
    pub args: Vec<Arg>,
}

impl Atom {
    pub fn new(relation: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            relation: relation.into(),
            args,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.relation)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// `head :- body.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<Atom>,
}

/// Parsed rule program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Declared relations (`f(s, p, o).`)
    pub facts: Vec<Atom>,
    /// Rules, in source order
    pub rules: Vec<Rule>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared relation by name
    pub fn fact(&self, relation: &str) -> Option<&Atom> {
        self.facts.iter().find(|a| a.relation == relation)
    }

    /// Rules whose head is `relation`
    pub fn rules_for<'a>(&'a self, relation: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.head.relation == relation)
    }

    /// Whether `relation` is defined by at least one rule
    pub fn is_derived(&self, relation: &str) -> bool {
        self.rules.iter().any(|r| r.head.relation == relation)
    }
}

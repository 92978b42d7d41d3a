//! Rule program parser using Pest

use crate::query::ast::{Arg, Atom, Program, Rule as RuleDef};
use crate::rdf::{Literal, NamedNode, RdfError, Term};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "query/rules.pest"]
struct RuleParser;

/// Parser errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Pest parsing error
    #[error("Parse error: {0}")]
    PestError(#[from] pest::error::Error<Rule>),

    /// Constant is not a valid reference
    #[error("Invalid constant: {0}")]
    InvalidConstant(#[from] RdfError),

    /// Semantic error
    #[error("Semantic error: {0}")]
    SemanticError(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a rule program
pub fn parse_program(input: &str) -> ParseResult<Program> {
    let mut program = Program::new();

    for pair in RuleParser::parse(Rule::program, input)? {
        for statement in pair.into_inner() {
            match statement.as_rule() {
                Rule::fact => {
                    if let Some(atom) = statement.into_inner().next() {
                        program.facts.push(parse_atom(atom)?);
                    }
                }
                Rule::rule => program.rules.push(parse_rule(statement)?),
                _ => {}
            }
        }
    }

    Ok(program)
}

fn parse_rule(pair: Pair<Rule>) -> ParseResult<RuleDef> {
    let text = pair.as_str().to_string();
    let mut head = None;
    let mut body = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::atom => head = Some(parse_atom(part)?),
            Rule::body => {
                for atom in part.into_inner() {
                    body.push(parse_atom(atom)?);
                }
            }
            _ => {}
        }
    }

    let head = head.ok_or_else(|| ParseError::SemanticError(format!("rule without head: {text}")))?;
    Ok(RuleDef { head, body })
}

fn parse_atom(pair: Pair<Rule>) -> ParseResult<Atom> {
    let mut relation = String::new();
    let mut args = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::name => relation = part.as_str().to_string(),
            Rule::variable => args.push(Arg::var(part.as_str())),
            Rule::curie => args.push(Arg::Const(NamedNode::new(part.as_str())?.into())),
            Rule::reference => {
                let body = part.as_str().trim_start_matches('<').trim_end_matches('>');
                args.push(Arg::Const(NamedNode::new(body)?.into()));
            }
            Rule::string => {
                let raw = part.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                args.push(Arg::Const(Term::Literal(Literal::new_simple_literal(unescape(raw)))));
            }
            _ => {}
        }
    }

    Ok(Atom::new(relation, args))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            },
            c => out.push(c),
        }
    }
    out
}

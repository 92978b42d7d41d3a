//! JSON-LD encoder (compact, flat documents)
//!
//! Accepts the node-object shape produced by the dataset entities:
//! - `@id` holds the subject as a plain string
//! - `@type` holds one class or an array of classes
//! - every other key is a predicate; its value is a string literal, a
//!   `{"@id": ...}` reference, a `{"@value": ...}` literal, or an array of those
//!
//! A top-level array encodes every node into the same bag.

use super::types::{Bag, Literal, NamedNode, RdfError, Term, Triple, RDF_TYPE};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Encoding errors
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Entity could not be turned into a JSON document
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Subject, predicate or reference is not a valid IRI
    #[error(transparent)]
    Rdf(#[from] RdfError),

    /// Node object without a usable `@id`
    #[error("Node object has no @id: {0}")]
    MissingId(String),

    /// Value shape outside the supported subset
    #[error("Unsupported value for {key}: {value}")]
    UnsupportedValue { key: String, value: String },
}

pub type EncodeResult<T> = Result<T, EncodeError>;

/// Serialize an entity (or a slice of entities) and encode it into a bag
pub fn encode_entity<T: Serialize + ?Sized>(entity: &T) -> EncodeResult<Bag> {
    let doc = serde_json::to_value(entity)?;
    encode(&doc)
}

/// Encode a JSON-LD document into a bag of triples
pub fn encode(doc: &Value) -> EncodeResult<Bag> {
    let mut bag = Bag::new();
    match doc {
        Value::Array(nodes) => {
            for node in nodes {
                encode_node(node, &mut bag)?;
            }
        }
        node => encode_node(node, &mut bag)?,
    }
    Ok(bag)
}

fn encode_node(node: &Value, bag: &mut Bag) -> EncodeResult<()> {
    let object = node
        .as_object()
        .ok_or_else(|| EncodeError::MissingId(node.to_string()))?;

    let subject = match object.get("@id") {
        Some(Value::String(id)) => NamedNode::new(id.as_str())?,
        _ => return Err(EncodeError::MissingId(node.to_string())),
    };

    for (key, value) in object {
        match key.as_str() {
            "@id" => {}
            "@type" => {
                let rdf_type = NamedNode::new(RDF_TYPE)?;
                for class in type_values(value)? {
                    bag.push(Triple::new(
                        subject.clone(),
                        rdf_type.clone(),
                        NamedNode::new(class)?.into(),
                    ));
                }
            }
            predicate => {
                let predicate_node = NamedNode::new(predicate)?;
                push_values(bag, &subject, &predicate_node, key, value)?;
            }
        }
    }
    Ok(())
}

fn type_values(value: &Value) -> EncodeResult<Vec<&str>> {
    match value {
        Value::String(class) => Ok(vec![class.as_str()]),
        Value::Array(classes) => classes
            .iter()
            .map(|c| {
                c.as_str().ok_or_else(|| unsupported("@type", c))
            })
            .collect(),
        other => Err(unsupported("@type", other)),
    }
}

fn push_values(
    bag: &mut Bag,
    subject: &NamedNode,
    predicate: &NamedNode,
    key: &str,
    value: &Value,
) -> EncodeResult<()> {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                if item.is_array() {
                    return Err(unsupported(key, item));
                }
                push_values(bag, subject, predicate, key, item)?;
            }
        }
        single => {
            let object = object_term(key, single)?;
            bag.push(Triple::new(subject.clone(), predicate.clone(), object));
        }
    }
    Ok(())
}

fn object_term(key: &str, value: &Value) -> EncodeResult<Term> {
    match value {
        Value::String(s) => Ok(Literal::new_simple_literal(s.as_str()).into()),
        Value::Bool(b) => Ok(Literal::new_simple_literal(b.to_string()).into()),
        Value::Number(n) => Ok(Literal::new_simple_literal(n.to_string()).into()),
        Value::Object(map) => reference_or_value(key, map, value),
        other => Err(unsupported(key, other)),
    }
}

fn reference_or_value(key: &str, map: &Map<String, Value>, value: &Value) -> EncodeResult<Term> {
    if map.len() != 1 {
        return Err(unsupported(key, value));
    }
    match (map.get("@id"), map.get("@value")) {
        (Some(Value::String(id)), _) => Ok(NamedNode::new(id.as_str())?.into()),
        (_, Some(Value::String(v))) => Ok(Literal::new_simple_literal(v.as_str()).into()),
        _ => Err(unsupported(key, value)),
    }
}

fn unsupported(key: &str, value: &Value) -> EncodeError {
    EncodeError::UnsupportedValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

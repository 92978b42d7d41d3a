//! Identifier scheme
//!
//! Identifiers are compact `prefix:local` strings. A child's identifier
//! extends its parent's (`edu:University0` → `edu:University0.Department3`
//! → `edu:University0.Department3/Course7`).
//!
//! Two wrappers keep ownership visible in the type system and on the wire:
//! [`Uid`] is the entity's own identifier and serializes as a plain string;
//! [`Iri`] points at some other entity and serializes as `{"@id": "..."}`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Namespace of generated instance identifiers
pub const INSTANCE_PREFIX: &str = "edu";

/// Namespace of the university ontology (classes and properties)
pub const ONTOLOGY_PREFIX: &str = "ub";

/// Identifier owned by the entity that carries it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(String);

impl Uid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Top-level identifier of the `index`-th university
    pub fn university(index: usize) -> Self {
        Self(format!("{INSTANCE_PREFIX}:University{index}"))
    }

    /// Ontology class tag such as `ub:GraduateStudent`
    pub fn class(name: &str) -> Self {
        Self(format!("{ONTOLOGY_PREFIX}:{name}"))
    }

    /// Extend this identifier with a separator and a local name
    pub fn child(&self, separator: char, local: &str) -> Self {
        let mut id = String::with_capacity(self.0.len() + 1 + local.len());
        id.push_str(&self.0);
        id.push(separator);
        id.push_str(local);
        Self(id)
    }

    /// A reference pointing at this identifier
    pub fn reference(&self) -> Iri {
        Iri(self.0.clone())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Uid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Reference to an identifier owned by another entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Uid> for Iri {
    fn from(uid: &Uid) -> Self {
        uid.reference()
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl Serialize for Iri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("@id", &self.0)?;
        map.end()
    }
}

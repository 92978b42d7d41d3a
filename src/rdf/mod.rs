//! RDF (Resource Description Framework) layer
//!
//! This module implements the pieces the benchmark needs from a triple store:
//! - RDF terms and triples (subject-predicate-object) over CURIE identifiers
//! - the `TripleStore` contract (`add` a bag, `match_pattern` to a cursor)
//! - an indexed in-memory store
//! - a JSON-LD encoder turning one entity document into a bag of triples
//!
//! # Example
//!
//! ```rust
//! use lubm::rdf::{encode, RdfStore, TriplePattern, TripleStore};
//! use serde_json::json;
//!
//! let mut store = RdfStore::new();
//!
//! let bag = encode(&json!({
//!     "@id": "edu:University0",
//!     "@type": "ub:University",
//!     "ub:name": "University0"
//! }))
//! .unwrap();
//! store.add(bag).unwrap();
//!
//! assert_eq!(store.match_pattern(&TriplePattern::any()).count(), 2);
//! ```

mod jsonld;
mod store;
mod types;

pub use types::{
    Bag, Literal, NamedNode, RdfError, RdfResult, Term, Triple, TriplePattern, RDF_TYPE,
};

pub use store::{RdfStore, RdfStoreError, RdfStoreResult, TripleCursor, TripleStore};

pub use jsonld::{encode, encode_entity, EncodeError, EncodeResult};

//! RDF triple store implementation
//!
//! This module defines the store contract consumed by ingestion and the
//! query adapter, plus an in-memory store with subject, predicate-object and
//! object indices.

use super::types::{Bag, NamedNode, Term, Triple, TriplePattern};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// RDF store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RdfStoreError {
    /// Bag would grow the store beyond its configured quota
    #[error("Triple quota exceeded: {current} stored + {incoming} incoming > {limit}")]
    QuotaExceeded {
        limit: usize,
        current: usize,
        incoming: usize,
    },
}

pub type RdfStoreResult<T> = Result<T, RdfStoreError>;

/// Iterator over the triples matching a pattern
pub type TripleCursor<'a> = Box<dyn Iterator<Item = &'a Triple> + 'a>;

/// Operations the ingestion pipeline and the query adapter need from a store
pub trait TripleStore {
    /// Insert every triple of the bag, returning how many were new
    fn add(&mut self, bag: Bag) -> RdfStoreResult<usize>;

    /// Open a cursor over the triples matching `pattern`
    fn match_pattern<'a>(&'a self, pattern: &TriplePattern) -> TripleCursor<'a>;

    /// Number of distinct triples held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RDF triple store with multiple indices for efficient queries
///
/// Implements:
/// - S index (Subject -> triples)
/// - PO index (Predicate -> Object -> triples)
/// - O index (Object -> triples)
///
/// Triples are kept once, in insertion order; indices hold positions.
#[derive(Debug, Clone, Default)]
pub struct RdfStore {
    /// All triples (primary storage)
    triples: Vec<Triple>,

    /// Subject -> positions
    s_index: FxHashMap<NamedNode, Vec<usize>>,

    /// Predicate -> Object -> positions
    po_index: FxHashMap<NamedNode, FxHashMap<Term, Vec<usize>>>,

    /// Object -> positions
    o_index: FxHashMap<Term, Vec<usize>>,

    /// Optional upper bound on stored triples
    quota: Option<usize>,
}

impl RdfStore {
    /// Create a new empty RDF store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects bags once `limit` triples would be exceeded
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota: Some(limit),
            ..Self::default()
        }
    }

    /// Insert a single triple; returns false if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.contains(&triple) {
            return false;
        }

        let pos = self.triples.len();
        self.s_index
            .entry(triple.subject.clone())
            .or_default()
            .push(pos);
        self.po_index
            .entry(triple.predicate.clone())
            .or_default()
            .entry(triple.object.clone())
            .or_default()
            .push(pos);
        self.o_index
            .entry(triple.object.clone())
            .or_default()
            .push(pos);
        self.triples.push(triple);
        true
    }

    /// Check if a triple exists in the store
    pub fn contains(&self, triple: &Triple) -> bool {
        self.s_index
            .get(&triple.subject)
            .map(|positions| positions.iter().any(|&i| &self.triples[i] == triple))
            .unwrap_or(false)
    }

    /// Get an iterator over all triples, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    fn positions<'a>(&'a self, ids: &'a [usize]) -> impl Iterator<Item = &'a Triple> + 'a {
        ids.iter().map(move |&i| &self.triples[i])
    }
}

impl TripleStore for RdfStore {
    fn add(&mut self, bag: Bag) -> RdfStoreResult<usize> {
        if let Some(limit) = self.quota {
            // Only triples new to the store count against the quota
            let incoming = bag
                .iter()
                .filter(|t| !self.contains(t))
                .collect::<FxHashSet<_>>()
                .len();
            if self.triples.len() + incoming > limit {
                return Err(RdfStoreError::QuotaExceeded {
                    limit,
                    current: self.triples.len(),
                    incoming,
                });
            }
        }

        let mut inserted = 0;
        for triple in bag {
            if self.insert(triple) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn match_pattern<'a>(&'a self, pattern: &TriplePattern) -> TripleCursor<'a> {
        let filter = pattern.clone();

        // Most selective index first: subject, then predicate+object, then
        // object, then predicate alone.
        let candidates: TripleCursor<'a> = match (&pattern.subject, &pattern.predicate, &pattern.object) {
            (Some(s), _, _) => match self.s_index.get(s) {
                Some(ids) => Box::new(self.positions(ids)),
                None => Box::new(std::iter::empty()),
            },
            (None, Some(p), Some(o)) => match self.po_index.get(p).and_then(|objs| objs.get(o)) {
                Some(ids) => Box::new(self.positions(ids)),
                None => Box::new(std::iter::empty()),
            },
            (None, None, Some(o)) => match self.o_index.get(o) {
                Some(ids) => Box::new(self.positions(ids)),
                None => Box::new(std::iter::empty()),
            },
            (None, Some(p), None) => match self.po_index.get(p) {
                Some(objs) => Box::new(objs.values().flat_map(move |ids| self.positions(ids))),
                None => Box::new(std::iter::empty()),
            },
            (None, None, None) => Box::new(self.triples.iter()),
        };

        if filter.bound_count() <= 1 && filter.subject.is_none() {
            // index lookup is already exact
            candidates
        } else {
            Box::new(candidates.filter(move |t| filter.matches(t)))
        }
    }

    fn len(&self) -> usize {
        self.triples.len()
    }
}

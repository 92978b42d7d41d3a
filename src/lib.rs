//! LUBM - Lehigh University Benchmark
//!
//! A synthetic university dataset generator, a streaming ingestion pipeline
//! and a rule-query bridge over an RDF triple store.
//!
//! # Architecture
//!
//! - `dataset`: seeded generator emitting universities, departments and
//!   their dependents as JSON-LD documents
//! - `rdf`: RDF terms, the `TripleStore` contract, an indexed in-memory
//!   store and the JSON-LD encoder
//! - `ingest`: bounded single-consumer queue between generator and store
//! - `query`: rule language (Pest grammar), compiler and pull-based evaluator
//! - `adapter`: the `f(s, p, o)` stream bridge from the evaluator to the store
//! - `benchmark`: load and query orchestration with per-query reports
//!
//! ## Example Usage
//!
//! ```rust
//! use lubm::dataset::{queries, DataSet};
//! use lubm::rdf::{Bag, RdfStore, TripleStore};
//! use lubm::QueryEngine;
//!
//! // Generate one university straight into memory
//! let mut dataset = DataSet::new(42, 1, Vec::<Bag>::new());
//! dataset.generate(0).unwrap();
//!
//! let mut store = RdfStore::new();
//! for bag in dataset.into_writer() {
//!     store.add(bag).unwrap();
//! }
//!
//! // Every department has undergraduates
//! let engine = QueryEngine::new();
//! let rows = engine.count(&queries::query5(None), &store).unwrap();
//! assert!(rows > 0);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod benchmark;
pub mod config;
pub mod dataset;
pub mod ingest;
pub mod query;
pub mod rdf;

// Re-export main types for convenience
pub use adapter::{pattern_streams, PatternStream};

pub use benchmark::{
    load_dataset, load_into, run, run_queries, BenchmarkError, BenchmarkReport, BenchmarkResult,
    LoadReport, QueryReport,
};

pub use config::{BenchmarkConfig, ConfigError};

pub use dataset::{BenchmarkQuery, DataSet, GenerateError, GenerateResult};

pub use ingest::{BagSink, BagWriter, IngestError, IngestHandle, IngestReport, IngestResult};

pub use query::{QueryEngine, QueryError, QueryResult, Tuple};

pub use rdf::{
    Bag, Literal, NamedNode, RdfStore, RdfStoreError, RdfStoreResult, Term, Triple,
    TriplePattern, TripleStore,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}

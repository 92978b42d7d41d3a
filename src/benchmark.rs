//! Benchmark orchestration
//!
//! Loading is structural: a generation or ingestion failure aborts the run.
//! Queries are independent units; a failing query is recorded in its report
//! and the remaining queries still run.

use crate::config::{BenchmarkConfig, ConfigError};
use crate::dataset::queries::{self, BenchmarkQuery};
use crate::dataset::{DataSet, GenerateError};
use crate::ingest::{self, IngestError};
use crate::query::QueryEngine;
use crate::rdf::{RdfStore, TripleStore};
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

/// Benchmark errors
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation failed: {0}")]
    Generate(#[from] GenerateError),

    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),
}

pub type BenchmarkResult<T> = Result<T, BenchmarkError>;

/// Dataset load statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub universities: usize,
    pub bags: usize,
    /// Triples received by the store
    pub triples: usize,
    /// Triples new to the store
    pub inserted: usize,
    pub elapsed_ms: f64,
}

/// Outcome of one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: f64,
}

impl QueryReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Full benchmark outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub config: BenchmarkConfig,
    pub load: LoadReport,
    pub queries: Vec<QueryReport>,
}

/// Store filled by [`load_into`]
#[derive(Debug)]
pub struct Loaded<S> {
    pub store: S,
    pub report: LoadReport,
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Generate the configured universities into a fresh [`RdfStore`]
pub fn load_dataset(config: &BenchmarkConfig) -> BenchmarkResult<Loaded<RdfStore>> {
    load_into(RdfStore::new(), config)
}

/// Generate the configured universities into `store`
pub fn load_into<S>(store: S, config: &BenchmarkConfig) -> BenchmarkResult<Loaded<S>>
where
    S: TripleStore + Send + 'static,
{
    config.validate()?;
    let start = Instant::now();

    let (writer, handle) = ingest::spawn(store, config.queue_capacity)?;
    let mut dataset = DataSet::new(config.seed, config.max_university_id(), writer);

    let mut failure = None;
    for index in 0..config.universities {
        if let Err(e) = dataset.generate(index) {
            failure = Some(e);
            break;
        }
        info!(
            "Loaded university {}/{}: {} triples ingested, {:.2?} elapsed",
            index + 1,
            config.universities,
            handle.progress(),
            start.elapsed()
        );
    }
    dataset.into_writer().close();

    let joined = handle.join();
    let ingested = match (failure, joined) {
        (None, Ok(ingested)) => ingested,
        // The consumer went away; its own error is the root cause
        (Some(GenerateError::Ingest(IngestError::Closed)), Err(root)) => return Err(root.into()),
        (Some(e), _) => return Err(e.into()),
        (None, Err(e)) => return Err(e.into()),
    };

    let report = LoadReport {
        universities: config.universities,
        bags: ingested.bags,
        triples: ingested.triples,
        inserted: ingested.inserted,
        elapsed_ms: millis(start.elapsed()),
    };
    info!(
        "Loaded {} triples ({} bags) in {:.2} ms",
        report.triples, report.bags, report.elapsed_ms
    );

    Ok(Loaded {
        store: ingested.store,
        report,
    })
}

/// Run one query, capturing failures in the report
pub fn run_query<S>(engine: &QueryEngine, store: &S, query: &BenchmarkQuery) -> QueryReport
where
    S: TripleStore + ?Sized,
{
    let start = Instant::now();
    let outcome = engine.count(&query.text, store);
    let elapsed_ms = millis(start.elapsed());

    match outcome {
        Ok(rows) => {
            info!("{}: {} rows in {:.2} ms", query.name, rows, elapsed_ms);
            QueryReport {
                name: query.name.to_string(),
                rows: Some(rows),
                error: None,
                elapsed_ms,
            }
        }
        Err(e) => {
            warn!("{} failed: {}", query.name, e);
            QueryReport {
                name: query.name.to_string(),
                rows: None,
                error: Some(e.to_string()),
                elapsed_ms,
            }
        }
    }
}

/// Run `queries` in order
pub fn run_queries<S>(engine: &QueryEngine, store: &S, queries: &[BenchmarkQuery]) -> Vec<QueryReport>
where
    S: TripleStore + ?Sized,
{
    queries
        .iter()
        .map(|query| run_query(engine, store, query))
        .collect()
}

/// Load the dataset and run the nine LUBM queries
pub fn run(config: &BenchmarkConfig) -> BenchmarkResult<BenchmarkReport> {
    let loaded = load_dataset(config)?;
    let engine = QueryEngine::new().with_goal(config.goal.clone());
    let queries = run_queries(&engine, &loaded.store, &queries::all());

    Ok(BenchmarkReport {
        config: config.clone(),
        load: loaded.report,
        queries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::RdfStoreError;

    #[test]
    fn test_load_single_university() {
        let loaded = load_dataset(&BenchmarkConfig::default()).unwrap();
        assert_eq!(loaded.report.universities, 1);
        assert!(loaded.report.triples > 0);
        assert_eq!(loaded.report.triples, loaded.report.inserted);
        assert_eq!(loaded.store.len(), loaded.report.inserted);
    }

    #[test]
    fn test_invalid_config() {
        let config = BenchmarkConfig::default().with_universities(0);
        assert!(matches!(
            load_dataset(&config),
            Err(BenchmarkError::Config(ConfigError::NoUniversities))
        ));
    }

    #[test]
    fn test_store_failure_is_root_cause() {
        let config = BenchmarkConfig::default().with_queue_capacity(1);
        let result = load_into(RdfStore::with_quota(100), &config);
        assert!(matches!(
            result,
            Err(BenchmarkError::Ingest(IngestError::Store(
                RdfStoreError::QuotaExceeded { .. }
            )))
        ));
    }

    #[test]
    fn test_failed_query_does_not_stop_the_batch() {
        let loaded = load_dataset(&BenchmarkConfig::default()).unwrap();
        let batch = vec![
            BenchmarkQuery::new("broken", "q(x) :- f(x, p".to_string()),
            BenchmarkQuery::new("Query6", queries::query6()),
        ];
        let reports = run_queries(&QueryEngine::new(), &loaded.store, &batch);

        assert_eq!(reports.len(), 2);
        assert!(!reports[0].is_ok());
        assert!(reports[0].rows.is_none());
        assert!(reports[1].is_ok());
        assert!(reports[1].rows.unwrap() > 0);
    }

    #[test]
    fn test_report_serializes() {
        let report = QueryReport {
            name: "Query1".to_string(),
            rows: Some(3),
            error: None,
            elapsed_ms: 1.5,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rows"], 3);
        assert!(json.get("error").is_none());
    }
}

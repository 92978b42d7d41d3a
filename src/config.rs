//! Benchmark configuration

use crate::query::DEFAULT_GOAL;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used by the reference LUBM runs
pub const DEFAULT_SEED: u64 = 1683234740;

/// Default ingestion queue capacity, in bags
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one university is required")]
    NoUniversities,

    #[error("Queue capacity must be positive")]
    ZeroCapacity,

    #[error("max_university_id ({max}) is below the number of universities ({universities})")]
    MaxIdTooSmall { max: usize, universities: usize },

    #[error("Query goal must not be empty")]
    EmptyGoal,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Generator seed
    pub seed: u64,
    /// Number of universities to generate
    pub universities: usize,
    /// Upper bound for degree references (None = `universities`)
    pub max_university_id: Option<usize>,
    /// Ingestion queue capacity, in bags
    pub queue_capacity: usize,
    /// Goal relation evaluated by each query
    pub goal: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            universities: 1,
            max_university_id: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            goal: DEFAULT_GOAL.to_string(),
        }
    }
}

impl BenchmarkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_universities(mut self, universities: usize) -> Self {
        self.universities = universities;
        self
    }

    pub fn with_max_university_id(mut self, max: usize) -> Self {
        self.max_university_id = Some(max);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    /// Effective degree-reference bound
    pub fn max_university_id(&self) -> usize {
        self.max_university_id.unwrap_or(self.universities)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.universities == 0 {
            return Err(ConfigError::NoUniversities);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_university_id() < self.universities {
            return Err(ConfigError::MaxIdTooSmall {
                max: self.max_university_id(),
                universities: self.universities,
            });
        }
        if self.goal.is_empty() {
            return Err(ConfigError::EmptyGoal);
        }
        Ok(())
    }
}

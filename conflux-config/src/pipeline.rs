use std::thread::available_parallelism;

use serde::{Deserialize, Serialize};

use crate::base::ValidationError;

/// Pipeline execution configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Number of transform workers to fan items out across.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Capacity of every conduit created by the pipeline, in items.
    ///
    /// A capacity of 1 gives rendezvous behavior: the producer suspends
    /// until the consumer takes the item.
    #[serde(default = "default_conduit_capacity")]
    pub conduit_capacity: usize,
    /// Upper bound, in milliseconds, of the random per-item delay injected
    /// around the user transform. Zero disables jitter.
    ///
    /// This exists to make timing and ordering properties observable in
    /// tests and demos; it is not a production knob.
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

impl PipelineConfig {
    /// Default capacity of pipeline conduits.
    pub const DEFAULT_CONDUIT_CAPACITY: usize = 1;

    /// Default jitter bound in milliseconds (disabled).
    pub const DEFAULT_MAX_JITTER_MS: u64 = 0;

    /// Validates pipeline configuration settings.
    ///
    /// Ensures workers and conduit_capacity are non-zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.workers == 0 {
            return Err(ValidationError::WorkersZero);
        }

        if self.conduit_capacity == 0 {
            return Err(ValidationError::ConduitCapacityZero);
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            conduit_capacity: default_conduit_capacity(),
            max_jitter_ms: default_max_jitter_ms(),
        }
    }
}

fn default_workers() -> usize {
    available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn default_conduit_capacity() -> usize {
    PipelineConfig::DEFAULT_CONDUIT_CAPACITY
}

fn default_max_jitter_ms() -> u64 {
    PipelineConfig::DEFAULT_MAX_JITTER_MS
}

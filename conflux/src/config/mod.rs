//! Configuration objects for conflux pipelines.
//!
//! This module contains re-exported configurations that are needed by conflux.

// Re-exports.
pub use conflux_config::*;

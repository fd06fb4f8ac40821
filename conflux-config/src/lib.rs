//! Configuration types shared across conflux pipelines.

mod base;
mod pipeline;

pub use base::ValidationError;
pub use pipeline::PipelineConfig;

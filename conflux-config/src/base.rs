use thiserror::Error;

/// Errors returned when validating configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Worker fan-out degree cannot be zero.
    #[error("`workers` cannot be zero")]
    WorkersZero,
    /// Conduit capacity cannot be zero.
    #[error("`conduit_capacity` cannot be zero")]
    ConduitCapacityZero,
}

//! Telemetry setup for conflux binaries and tests.

pub mod tracing;

//! In-process concurrent pipeline primitives.
//!
//! conflux provides the building blocks for fan-out/fan-in item pipelines:
//! a lazy [`stages::source`] feeding a conduit, parallel
//! [`stages::transform`] workers competing over that conduit, a
//! [`stages::merge`] stage multiplexing worker outputs back into a single
//! conduit, and an ordered alternative built on
//! [`stages::completion::CompletionHandle`] when submission order must
//! survive concurrent execution.

pub mod concurrency;
pub mod conduit;
pub mod config;
pub mod error;
pub mod macros;
pub mod pipeline;
pub mod stages;

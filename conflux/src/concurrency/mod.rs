//! Concurrency utilities for coordinating pipeline stages.
//!
//! Two coordination concerns cut across every stage of a pipeline:
//!
//! - **Cancellation.** The [`shutdown`] module implements a broadcast shutdown
//!   signal that stages check at each suspension point, so a consumer that
//!   abandons a pipeline can cut its producers short instead of leaking them.
//! - **Join barriers.** The [`wait`] module tracks how many concurrent
//!   producers are still feeding a shared conduit, so closing that conduit can
//!   be deferred to a single watcher that acts only once every producer has
//!   finished. This is what makes fan-in closure single-owner even though the
//!   conduit itself has many writers.

pub mod shutdown;
pub mod wait;

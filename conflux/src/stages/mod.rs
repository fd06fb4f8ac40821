//! Pipeline stages.
//!
//! A pipeline is assembled from free-standing stage constructors, each of
//! which allocates a fresh output conduit, spawns exactly one task that owns
//! the send half, and returns the receive half immediately:
//!
//! - [`source`] produces a finite item sequence into a conduit.
//! - [`transform`] maps items from a shared input conduit; invoking it k
//!   times over the same [`crate::conduit::SharedItemRx`] is fan-out.
//! - [`merge`] multiplexes many conduits into one (fan-in), racing by
//!   completion time.
//! - [`completion`] is the order-preserving alternative to fan-in: one
//!   independently buffered result slot per work item.
//! - [`sink`] drains a terminal conduit into a `Vec`.

pub mod completion;
pub mod merge;
pub mod sink;
pub mod source;
pub mod transform;

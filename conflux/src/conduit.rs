//! The conduit primitive used for all inter-stage communication.
//!
//! A conduit is a bounded FIFO channel with an explicit closed state, built on
//! [`tokio::sync::mpsc`]. Closure is structural: the conduit closes once every
//! [`ItemTx`] clone has been dropped, so exactly the producers that own the send
//! half decide when the stream of items ends, and a double close cannot be
//! expressed. Within a single producer/consumer pair, items are delivered in
//! send order.

use core::pin::Pin;
use core::task::{Context, Poll};
use std::sync::Arc;

use futures::Stream;
use pin_project_lite::pin_project;
use tokio::sync::Mutex;
use tokio::sync::mpsc;

/// Transmitter side of a conduit.
pub type ItemTx<T> = mpsc::Sender<T>;

/// Receiver side of a conduit.
pub type ItemRx<T> = mpsc::Receiver<T>;

/// Creates a new conduit with the given capacity.
///
/// A capacity of 1 gives rendezvous behavior: each send suspends until the
/// receiver has taken the previous item, which is the tightest form of
/// backpressure a stage can apply to its producer.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn create_conduit<T>(capacity: usize) -> (ItemTx<T>, ItemRx<T>) {
    mpsc::channel(capacity)
}

/// Cloneable receive handle allowing multiple consumers to compete over one conduit.
///
/// [`SharedItemRx`] is the fan-out half of the system: any number of transform
/// workers can hold a clone and call [`recv`](SharedItemRx::recv) concurrently.
/// Each item is delivered to exactly one of the competing consumers, with no
/// duplication and no loss. Which consumer receives a given item is unspecified
/// and depends on scheduling, which is what makes fan-out output ordering
/// non-deterministic.
#[derive(Debug)]
pub struct SharedItemRx<T> {
    inner: Arc<Mutex<ItemRx<T>>>,
}

impl<T> SharedItemRx<T> {
    /// Wraps an exclusive receiver into a shared competing-consumer handle.
    pub fn new(rx: ItemRx<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rx)),
        }
    }

    /// Receives the next item, suspending until one is available.
    ///
    /// Returns [`None`] once the conduit is closed and fully drained.
    pub async fn recv(&self) -> Option<T> {
        self.inner.lock().await.recv().await
    }
}

impl<T> Clone for SharedItemRx<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> From<ItemRx<T>> for SharedItemRx<T> {
    fn from(rx: ItemRx<T>) -> Self {
        Self::new(rx)
    }
}

pin_project! {
    /// A [`Stream`] adapter over the receive side of a conduit.
    ///
    /// Yields items until the conduit closes, then ends. Useful for consumers
    /// that want to drain a pipeline with stream combinators instead of a
    /// receive loop.
    #[must_use = "streams do nothing unless polled"]
    #[derive(Debug)]
    pub struct ConduitStream<T> {
        rx: ItemRx<T>,
    }
}

impl<T> ConduitStream<T> {
    /// Creates a new [`ConduitStream`] wrapping `rx`.
    pub fn new(rx: ItemRx<T>) -> Self {
        Self { rx }
    }
}

impl<T> Stream for ConduitStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().rx.poll_recv(cx)
    }
}

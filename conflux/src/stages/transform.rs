//! Transform stage: parallel per-item mapping over a shared input conduit.

use std::future::Future;

use tracing::debug;

use crate::concurrency::shutdown::ShutdownRx;
use crate::conduit::{ItemRx, SharedItemRx, create_conduit};

/// Spawns one transform worker over `input` and returns its output conduit.
///
/// The output conduit is returned immediately; the spawned task repeatedly
/// receives from `input` until it is closed and drained, applies `apply` to
/// each item (any latency inside `apply` is a suspension point), forwards the
/// result, then closes the output by dropping its sole sender.
///
/// Calling `transform` k times over clones of the same [`SharedItemRx`] is
/// fan-out: each input item reaches exactly one of the k workers, but which
/// worker, and therefore the interleaving of the k outputs, is unspecified.
/// A single `transform` over a single producer preserves input order exactly.
///
/// Transforms are infallible by contract. A caller that needs failure
/// propagation should make `T` a `Result`-shaped item so failures travel
/// through the pipeline as tagged items instead of being dropped.
///
/// On shutdown the worker stops receiving and closes its output; items
/// already taken from `input` are still transformed and forwarded.
pub fn transform<T, F, Fut>(
    input: SharedItemRx<T>,
    apply: F,
    capacity: usize,
    mut shutdown_rx: ShutdownRx,
) -> ItemRx<T>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send,
{
    let (tx, rx) = create_conduit(capacity);

    tokio::spawn(async move {
        loop {
            let item = tokio::select! {
                _ = shutdown_rx.signaled() => {
                    debug!("shutdown signaled, transform worker stopping");
                    break;
                }
                item = input.recv() => match item {
                    Some(item) => item,
                    None => break,
                },
            };

            let transformed = apply(item).await;
            if tx.send(transformed).await.is_err() {
                debug!("transform output abandoned by consumer, worker stopping");
                break;
            }
        }
    });

    rx
}

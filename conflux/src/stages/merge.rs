//! Merge stage: fan-in of many conduits into one.

use tracing::debug;

use crate::concurrency::wait::WaitCoordinator;
use crate::conduit::{ItemRx, create_conduit};

/// Multiplexes every item from `inputs` into a single output conduit.
///
/// One forwarding task is spawned per input conduit; each drains its input
/// into the shared output and then reports completion to a [`WaitCoordinator`]
/// that was sized to `inputs.len()` before anything was spawned. A dedicated
/// watcher task waits on the coordinator and drops the last sender, so the
/// output conduit is closed exactly once, and only after every input has
/// closed and been fully drained.
///
/// Every input item appears exactly once in the output. There is no ordering
/// guarantee across different inputs: the forwarding tasks race to send, and
/// relative order reflects real-time completion, not input index. Callers that
/// need submission order must use
/// [`CompletionHandle`](crate::stages::completion::CompletionHandle) instead.
///
/// An input that never closes keeps the output open forever. That hang is the
/// documented failure mode of fan-in; bound it with [`tokio::time::timeout`]
/// or a shutdown signal on the upstream stages.
pub fn merge<T>(inputs: Vec<ItemRx<T>>, capacity: usize) -> ItemRx<T>
where
    T: Send + 'static,
{
    let (tx, rx) = create_conduit(capacity);

    // Registration before spawn: the coordinator must know the full
    // participant count before any forwarder can report completion.
    let coordinator = WaitCoordinator::new(inputs.len());

    for mut input in inputs {
        let tx = tx.clone();
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            while let Some(item) = input.recv().await {
                if tx.send(item).await.is_err() {
                    debug!("merged conduit abandoned by consumer, forwarder stopping");
                    break;
                }
            }
            coordinator.done();
        });
    }

    // The watcher owns the original sender; dropping it once all forwarders
    // have finished is what closes the merged conduit.
    tokio::spawn(async move {
        coordinator.wait_idle().await;
        debug!("all inputs drained, closing merged conduit");
        drop(tx);
    });

    rx
}

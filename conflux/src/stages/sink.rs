//! Terminal consumer loops.

use crate::concurrency::shutdown::{ShutdownResult, ShutdownRx};
use crate::conduit::ItemRx;

/// Drains `rx` until closure, collecting every item in arrival order.
pub async fn collect<T>(mut rx: ItemRx<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Some(item) = rx.recv().await {
        items.push(item);
    }
    items
}

/// Drains `rx` until closure or until shutdown is signaled.
///
/// On shutdown the items collected so far are returned in the `Shutdown`
/// variant, so a caller abandoning a pipeline keeps its partial progress.
pub async fn collect_with_shutdown<T>(
    mut rx: ItemRx<T>,
    mut shutdown_rx: ShutdownRx,
) -> ShutdownResult<Vec<T>, Vec<T>> {
    let mut items = Vec::new();
    loop {
        tokio::select! {
            _ = shutdown_rx.signaled() => return ShutdownResult::Shutdown(items),
            item = rx.recv() => match item {
                Some(item) => items.push(item),
                None => return ShutdownResult::Ok(items),
            },
        }
    }
}

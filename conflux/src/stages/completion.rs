//! Ordered completion stage: per-item result handles.
//!
//! Where [`merge`](crate::stages::merge::merge) interleaves results by
//! completion time, a [`CompletionHandle`] buffers each result independently,
//! so awaiting handles in creation order yields results in creation order no
//! matter which underlying computation finished first. Since every computation
//! starts at handle creation, awaiting n handles sequentially costs the
//! slowest computation, not the sum.

use core::pin::Pin;
use core::task::{Context, Poll};
use std::future::Future;

use pin_project_lite::pin_project;
use tokio::sync::oneshot;

use crate::conflux_error;
use crate::error::{ConfluxResult, ErrorKind};

pin_project! {
    /// A started computation whose single result is retrieved later.
    ///
    /// The handle pairs a one-slot result conduit with a task that was spawned
    /// at construction. Retrieval consumes the handle, so a second await is
    /// rejected at compile time rather than hanging at runtime.
    #[must_use = "a completion handle does nothing unless awaited"]
    #[derive(Debug)]
    pub struct CompletionHandle<T> {
        #[pin]
        rx: oneshot::Receiver<T>,
    }
}

impl<T> CompletionHandle<T>
where
    T: Send + 'static,
{
    /// Starts `work` immediately and returns its handle without blocking.
    pub fn start<F, Fut>(work: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send,
    {
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let result = work().await;
            // The receiver may already be gone; the result is discarded then.
            let _ = tx.send(result);
        });

        Self { rx }
    }

    /// Retrieves the result, suspending until the computation has produced it.
    ///
    /// Returns [`ErrorKind::CompletionDropped`] if the task finished without
    /// sending a result, which only happens when the computation panicked.
    pub async fn wait(self) -> ConfluxResult<T> {
        self.rx.await.map_err(|_| {
            conflux_error!(
                ErrorKind::CompletionDropped,
                "completion task finished without producing a result"
            )
        })
    }
}

impl<T> Future for CompletionHandle<T> {
    type Output = ConfluxResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().rx.poll(cx).map(|result| {
            result.map_err(|_| {
                conflux_error!(
                    ErrorKind::CompletionDropped,
                    "completion task finished without producing a result"
                )
            })
        })
    }
}

/// Awaits `handles` in submission order, returning results in that order.
///
/// Wall-clock cost is bounded by the slowest handle, since every computation
/// is already running.
pub async fn wait_all<T>(handles: Vec<CompletionHandle<T>>) -> ConfluxResult<Vec<T>>
where
    T: Send + 'static,
{
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.wait().await?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_returns_the_computed_value() {
        let handle = CompletionHandle::start(|| async { 7 });
        assert_eq!(handle.wait().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn handle_is_awaitable_as_a_future() {
        let handle = CompletionHandle::start(|| async { "done" });
        assert_eq!(handle.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn panicked_task_reports_completion_dropped() {
        let handle: CompletionHandle<u64> = CompletionHandle::start(|| async {
            panic!("computation failed");
        });

        let err = handle.wait().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CompletionDropped);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn work_starts_before_wait_is_called() {
        let (started_tx, started_rx) = oneshot::channel();
        let _handle = CompletionHandle::start(move || async move {
            let _ = started_tx.send(());
            0u64
        });

        // The task must run without anyone awaiting the handle.
        tokio::time::timeout(std::time::Duration::from_secs(1), started_rx)
            .await
            .unwrap()
            .unwrap();
    }
}

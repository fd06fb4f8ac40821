//! Broadcast shutdown signaling for pipeline stages.
//!
//! A single [`ShutdownTx`] can cut short any number of stage tasks at once.
//! The signal is level-triggered: subscribers that check after the signal was
//! sent still observe it, so late-spawned stages shut down correctly.

use tokio::sync::watch;

/// Transmitter side of the shutdown channel.
///
/// Held by the pipeline owner; every stage task holds a [`ShutdownRx`]
/// subscribed from it.
#[derive(Debug, Clone)]
pub struct ShutdownTx {
    tx: watch::Sender<bool>,
}

impl ShutdownTx {
    /// Signals shutdown to all current and future subscribers.
    ///
    /// Idempotent: signaling more than once has no further effect.
    pub fn shutdown(&self) {
        // Send can only fail when no receiver exists, which means there is
        // nothing left to shut down.
        let _ = self.tx.send(true);
    }

    /// Creates a new [`ShutdownRx`] subscribed to this transmitter.
    pub fn subscribe(&self) -> ShutdownRx {
        ShutdownRx {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiver side of the shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownRx {
    rx: watch::Receiver<bool>,
}

impl ShutdownRx {
    /// Suspends until shutdown has been signaled.
    ///
    /// Returns immediately if shutdown was already signaled. If the
    /// [`ShutdownTx`] is dropped without signaling, shutdown can never occur
    /// and this future stays pending forever.
    pub async fn signaled(&mut self) {
        if self.rx.wait_for(|signaled| *signaled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Returns whether shutdown has been signaled, without suspending.
    pub fn is_signaled(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Creates a new shutdown channel.
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTx { tx }, ShutdownRx { rx })
}

/// Outcome of an operation that may be cut short by shutdown.
///
/// The `Shutdown` variant carries whatever the operation had accumulated when
/// the signal arrived, so partial progress is surfaced rather than discarded.
#[derive(Debug, PartialEq, Eq)]
pub enum ShutdownResult<T, I> {
    /// The operation ran to normal completion.
    Ok(T),
    /// The operation was interrupted by shutdown, with partial state attached.
    Shutdown(I),
}

impl<T, I> ShutdownResult<T, I> {
    /// Returns whether this result was produced by a shutdown interruption.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, ShutdownResult::Shutdown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn late_subscriber_observes_earlier_signal() {
        let (tx, _rx) = create_shutdown_channel();
        tx.shutdown();

        let mut late = tx.subscribe();
        assert!(late.is_signaled());
        // Must resolve immediately, not wait for a new send.
        tokio::time::timeout(Duration::from_secs(1), late.signaled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn signaled_unblocks_a_waiting_subscriber() {
        let (tx, mut rx) = create_shutdown_channel();
        assert!(!rx.is_signaled());

        let waiter = tokio::spawn(async move {
            rx.signaled().await;
        });

        tx.shutdown();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}

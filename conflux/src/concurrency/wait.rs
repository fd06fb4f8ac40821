//! Join barrier for tracking outstanding concurrent producers.

use tokio::sync::watch;

/// Counter-based join barrier over a fixed set of participants.
///
/// The participant count is fixed at construction, before any participant task
/// is spawned. This ordering matters: if registration could happen after
/// spawning, a fast participant calling [`done`](WaitCoordinator::done) could
/// drive the counter to zero while peers are still being registered, and a
/// watcher would observe completion prematurely.
///
/// The counter lives in a watch channel rather than a polled integer, so
/// [`wait_idle`](WaitCoordinator::wait_idle) suspends until the exact update
/// that reaches zero.
#[derive(Debug, Clone)]
pub struct WaitCoordinator {
    remaining: watch::Sender<usize>,
}

impl WaitCoordinator {
    /// Creates a coordinator expecting `participants` calls to [`done`](Self::done).
    ///
    /// With zero participants the coordinator is idle from the start.
    pub fn new(participants: usize) -> Self {
        let (remaining, _) = watch::channel(participants);
        Self { remaining }
    }

    /// Records the completion of one participant.
    ///
    /// Each participant must call this exactly once.
    pub fn done(&self) {
        self.remaining.send_modify(|remaining| {
            *remaining = remaining.saturating_sub(1);
        });
    }

    /// Suspends until every participant has reported completion.
    pub async fn wait_idle(&self) {
        let mut rx = self.remaining.subscribe();
        // Cannot fail: `self` keeps the sender alive while we wait.
        let _ = rx.wait_for(|remaining| *remaining == 0).await;
    }

    /// Returns the number of participants that have not yet completed.
    pub fn remaining(&self) -> usize {
        *self.remaining.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn idle_only_after_every_participant_is_done() {
        let coordinator = WaitCoordinator::new(3);

        coordinator.done();
        coordinator.done();
        assert_eq!(coordinator.remaining(), 1);

        // Two of three done: the barrier must still hold.
        assert!(
            timeout(Duration::from_millis(50), coordinator.wait_idle())
                .await
                .is_err()
        );

        coordinator.done();
        timeout(Duration::from_secs(1), coordinator.wait_idle())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn zero_participants_is_immediately_idle() {
        let coordinator = WaitCoordinator::new(0);
        timeout(Duration::from_secs(1), coordinator.wait_idle())
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn watcher_observes_idle_across_tasks() {
        let coordinator = WaitCoordinator::new(8);

        for _ in 0..8 {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator.done();
            });
        }

        timeout(Duration::from_secs(1), coordinator.wait_idle())
            .await
            .unwrap();
        assert_eq!(coordinator.remaining(), 0);
    }
}

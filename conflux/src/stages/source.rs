//! Stream source: the single-producer stage feeding a pipeline.

use tracing::debug;

use crate::conduit::{ItemRx, create_conduit};

/// Produces every item of `items` into a fresh conduit, in iterator order.
///
/// Returns the receive half immediately; one spawned task performs the sends,
/// suspending on a full conduit so the consumer's pace backpressures the
/// producer. The conduit closes after the last send and only after the last
/// send, so a consumer never observes a closed-but-incomplete sequence. An
/// empty iterator closes the conduit immediately with zero items produced.
///
/// Generation is infallible. If the consumer drops the receive half early,
/// the task stops producing and discards the rest of the iterator.
pub fn from_iter<T, I>(items: I, capacity: usize) -> ItemRx<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = T> + Send + 'static,
    I::IntoIter: Send,
{
    let (tx, rx) = create_conduit(capacity);

    tokio::spawn(async move {
        for item in items {
            if tx.send(item).await.is_err() {
                debug!("source conduit abandoned by consumer, stopping generation");
                return;
            }
        }
    });

    rx
}

/// Produces the indices `0..n` in increasing order.
pub fn generate(n: u64, capacity: usize) -> ItemRx<u64> {
    from_iter(0..n, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_yields_indices_in_order_then_closes() {
        let mut rx = generate(5, 1);

        let mut items = Vec::new();
        while let Some(item) = rx.recv().await {
            items.push(item);
        }

        assert_eq!(items, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn generate_zero_closes_immediately_with_no_items() {
        let mut rx = generate(0, 1);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn source_stops_when_consumer_drops() {
        // An endless iterator must not keep the task alive once the receive
        // half is gone.
        let mut rx = from_iter(0u64.., 1);
        assert_eq!(rx.recv().await, Some(0));
        drop(rx);
        // Nothing to assert beyond not hanging: the spawned task exits on
        // its next failed send.
    }
}

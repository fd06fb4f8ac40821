//! Pipeline orchestrator: wires source, fan-out transforms, and fan-in
//! together under one configuration and one shutdown signal.

use std::future::Future;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use conflux_config::PipelineConfig;
use rand::Rng;
use tracing::info;

use crate::bail;
use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::conduit::{ItemRx, SharedItemRx};
use crate::error::{ConfluxResult, ErrorKind};
use crate::stages::merge::merge;
use crate::stages::source::from_iter;
use crate::stages::transform::transform;

enum PipelineState<I, F> {
    NotStarted { items: I, apply: F },
    Started,
}

/// A configured fan-out/fan-in pipeline.
///
/// [`Pipeline`] owns the item supplier, the user transform, and the shutdown
/// channel shared by every stage it spawns. [`start`](Pipeline::start) builds
/// the source stage, k transform workers competing over it, and the merge
/// stage, then hands back the merged conduit; the caller drains it with
/// [`crate::stages::sink`] or a receive loop.
pub struct Pipeline<I, F> {
    config: Arc<PipelineConfig>,
    shutdown_tx: ShutdownTx,
    state: PipelineState<I, F>,
}

impl<I, F> Pipeline<I, F> {
    /// Creates a pipeline over `items`, transformed by `apply`.
    ///
    /// Nothing runs until [`start`](Pipeline::start) is called.
    pub fn new(config: PipelineConfig, items: I, apply: F) -> Self {
        // The receiver is dropped here on purpose: every stage subscribes its
        // own receiver from the transmitter when it is spawned.
        let (shutdown_tx, _) = create_shutdown_channel();

        Self {
            config: Arc::new(config),
            shutdown_tx,
            state: PipelineState::NotStarted { items, apply },
        }
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns a clone of the shutdown transmitter.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Signals every stage of this pipeline to shut down.
    pub fn shutdown(&self) {
        self.shutdown_tx.shutdown();
    }

    /// Starts the pipeline and returns the merged output conduit.
    ///
    /// Validates the configuration, spawns the source, fans items out across
    /// `config.workers` transform workers competing over the source conduit,
    /// and merges the worker outputs. Output ordering across workers is
    /// unspecified; with a single worker, input order is preserved.
    ///
    /// When `config.max_jitter_ms` is non-zero, a random delay up to that
    /// bound is injected ahead of `apply` on every item, which makes the
    /// non-deterministic interleaving of fan-out readily observable.
    ///
    /// Starting a pipeline twice returns [`ErrorKind::PipelineAlreadyStarted`].
    pub fn start<T, Fut>(&mut self) -> ConfluxResult<ItemRx<T>>
    where
        T: Send + 'static,
        I: IntoIterator<Item = T> + Send + 'static,
        I::IntoIter: Send,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send,
    {
        self.config.validate()?;

        let PipelineState::NotStarted { items, apply } =
            mem::replace(&mut self.state, PipelineState::Started)
        else {
            bail!(
                ErrorKind::PipelineAlreadyStarted,
                "pipeline was already started"
            );
        };

        let workers = self.config.workers;
        let capacity = self.config.conduit_capacity;
        let max_jitter_ms = self.config.max_jitter_ms;

        info!(
            workers,
            capacity, max_jitter_ms, "starting fan-out/fan-in pipeline"
        );

        let input = SharedItemRx::new(from_iter(items, capacity));
        let apply = Arc::new(apply);

        let mut outputs = Vec::with_capacity(workers);
        for _ in 0..workers {
            let apply = Arc::clone(&apply);
            let worker_fn = move |item: T| {
                let apply = Arc::clone(&apply);
                async move {
                    if max_jitter_ms > 0 {
                        let jitter = rand::thread_rng().gen_range(0..=max_jitter_ms);
                        tokio::time::sleep(Duration::from_millis(jitter)).await;
                    }
                    apply(item).await
                }
            };

            outputs.push(transform(
                input.clone(),
                worker_fn,
                capacity,
                self.shutdown_tx.subscribe(),
            ));
        }

        Ok(merge(outputs, capacity))
    }
}

//! Watcher scheduler for continuous operation

use crate::error::WatcherError;
use crate::metrics::WatcherMetrics;
use crate::pipeline::{ItemReport, Pipeline};
use formlink_domain::traits::{DocumentFetcher, Registry, TaskStore, TextDecoder};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Polls the backlog and runs each item through the pipeline
///
/// Items are processed strictly one at a time. The interval is measured from
/// the end of one tick to the start of the next.
///
/// # Examples
///
/// ```no_run
/// use formlink_watcher::{LivePipeline, Watcher, WatcherConfig};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = WatcherConfig::default();
/// let pipeline = LivePipeline::from_config(&config)?;
/// let mut watcher = Watcher::new(pipeline, config.poll_interval());
///
/// let cancel = CancellationToken::new();
/// watcher.run(cancel).await;
/// # Ok(())
/// # }
/// ```
pub struct Watcher<S, F, R, D> {
    pipeline: Pipeline<S, F, R, D>,
    interval: Duration,
    metrics: WatcherMetrics,
}

impl<S, F, R, D> Watcher<S, F, R, D>
where
    S: TaskStore,
    F: DocumentFetcher,
    R: Registry,
    D: TextDecoder,
{
    /// Create a watcher that pauses `interval` between ticks
    pub fn new(pipeline: Pipeline<S, F, R, D>, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            metrics: WatcherMetrics::new(),
        }
    }

    /// Get a reference to the pipeline
    pub fn pipeline(&self) -> &Pipeline<S, F, R, D> {
        &self.pipeline
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &WatcherMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Process every backlog item once
    ///
    /// Each item is read again from the Task Store just before it runs, so the
    /// guard sees its current state rather than the listing snapshot. An item
    /// error aborts the rest of the tick and is returned; the remaining items
    /// wait for the next tick.
    pub async fn run_once(&mut self) -> Result<Vec<ItemReport>, WatcherError> {
        self.metrics.record_tick();

        let items = match self.pipeline.backlog().await {
            Ok(items) => items,
            Err(e) => {
                self.metrics.record_failed_tick();
                return Err(e);
            }
        };
        tracing::info!("Backlog holds {} items", items.len());

        let mut reports = Vec::with_capacity(items.len());
        for item in &items {
            match self.pipeline.process_by_id(&item.id).await {
                Ok(report) => {
                    self.metrics.record_item(&report);
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!("Item '{}' ({}) aborted the tick: {}", item.name, item.id, e);
                    self.metrics.record_failed_tick();
                    return Err(e);
                }
            }
        }
        Ok(reports)
    }

    /// Run until `cancel` fires
    ///
    /// Tick errors are logged and counted; they never stop the loop.
    /// Cancellation is observed before and after each tick and during the
    /// pause between ticks.
    pub async fn run(&mut self, cancel: CancellationToken) {
        tracing::info!("Watcher started (interval: {:?})", self.interval);

        loop {
            if cancel.is_cancelled() {
                break;
            }

            tracing::debug!("Starting tick {}", self.metrics.ticks + 1);
            self.tick().await;

            if cancel.is_cancelled() {
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Watcher stopped. Final metrics:\n{}", self.metrics.summary());
    }

    /// Run exactly `cycles` ticks with the configured pause in between
    ///
    /// Tick errors are logged and counted the same way as in [`Watcher::run`].
    pub async fn run_cycles(&mut self, cycles: usize) {
        tracing::info!(
            "Watcher started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            if cycle > 0 {
                tokio::time::sleep(self.interval).await;
            }
            tracing::debug!("Starting tick {}/{}", cycle + 1, cycles);
            self.tick().await;
        }

        tracing::info!("Watcher finished {} cycles. Final metrics:\n{}", cycles, self.metrics.summary());
    }

    async fn tick(&mut self) {
        match self.run_once().await {
            Ok(reports) => tracing::info!("Tick completed: {} items handled", reports.len()),
            Err(e) => tracing::error!("Tick failed: {}", e),
        }
    }
}

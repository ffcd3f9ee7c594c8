//! Background traffic reconciler.
//!
//! Drains the counter store into a [`TrafficSink`] on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::collector::{CounterStore, Snapshot};
use crate::error::AgentError;
use crate::sink::TrafficSink;

/// Drains a [`CounterStore`] into a [`TrafficSink`], merging failed batches
/// back into the store.
pub struct Reconciler {
    store: CounterStore,
    sink: Arc<dyn TrafficSink>,
    max_pending_keys: Option<usize>,
}

impl Reconciler {
    pub fn new(store: CounterStore, sink: Arc<dyn TrafficSink>) -> Self {
        Self {
            store,
            sink,
            max_pending_keys: None,
        }
    }

    /// Bound the number of keys a failed flush may leave in the store.
    pub fn with_max_pending_keys(mut self, max: Option<usize>) -> Self {
        self.max_pending_keys = max;
        self
    }

    /// Flush once.
    ///
    /// Returns the number of identities pushed; `0` means the store was
    /// empty and the sink was not called. On error the drained counters have
    /// already been merged back.
    pub async fn flush(&self) -> Result<usize, AgentError> {
        let batch = self.store.take_snapshot();
        if batch.is_empty() {
            tally_metrics::record_flush("idle");
            return Ok(0);
        }

        match self.sink.push(&batch).await {
            Ok(()) => {
                let (tx, rx) = totals(&batch);
                tally_metrics::record_flush("ok");
                tally_metrics::record_flushed_bytes(tx, rx);
                debug!(identities = batch.len(), tx, rx, "traffic flushed");
                Ok(batch.len())
            }
            Err(e) => {
                tally_metrics::record_flush("error");
                tally_metrics::record_error(e.error_type());
                let (merged, dropped) = self.store.merge_back(batch, self.max_pending_keys);
                tally_metrics::record_rollback(merged, dropped);
                error!(error = %e, rolled_back = merged, "traffic flush failed");
                if dropped > 0 {
                    warn!(
                        dropped,
                        max_pending_keys = ?self.max_pending_keys,
                        "pending key limit reached, dropped unflushed counters"
                    );
                }
                Err(e)
            }
        }
    }

    /// Run the flush loop until `shutdown` is cancelled.
    ///
    /// The first flush happens one `interval` after start. Each flush is
    /// awaited before the next tick, so flushes never overlap. A final flush
    /// is attempted on shutdown.
    pub async fn run(&self, interval: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = interval.as_secs(), "traffic reconciler started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    debug!("reconciler shutting down, final flush");
                    // Errors are already logged and rolled back.
                    let _ = self.flush().await;
                    return;
                }

                _ = ticker.tick() => {
                    let _ = self.flush().await;
                }
            }
        }
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("store", &self.store)
            .field("max_pending_keys", &self.max_pending_keys)
            .finish_non_exhaustive()
    }
}

fn totals(batch: &Snapshot) -> (u64, u64) {
    batch.values().fold((0u64, 0u64), |(tx, rx), e| {
        (tx.saturating_add(e.tx), rx.saturating_add(e.rx))
    })
}

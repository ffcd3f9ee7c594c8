//! Background identity refresh loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::IdentityCache;
use crate::traits::IdentitySource;

/// Run the identity refresh loop.
///
/// Refreshes immediately, then every `interval` after a success or every
/// `retry_delay` after a failure, until `shutdown` is cancelled. Each fetch
/// is bounded by `interval`. Failed refreshes leave the installed
/// generation in place.
pub async fn run_refresher(
    cache: Arc<IdentityCache>,
    source: Arc<dyn IdentitySource>,
    interval: Duration,
    retry_delay: Duration,
    shutdown: CancellationToken,
) {
    loop {
        let outcome = tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                debug!("identity refresher shutting down");
                return;
            }

            outcome = cache.refresh(source.as_ref(), interval) => outcome,
        };

        let wait = match outcome {
            Ok(generation) => {
                tally_metrics::record_identity_refresh("ok");
                info!(generation, identities = cache.len(), "identity list refreshed");
                interval
            }
            Err(e) => {
                tally_metrics::record_identity_refresh("error");
                tally_metrics::record_error(e.error_type());
                warn!(
                    error = %e,
                    retry_in = ?retry_delay,
                    generation = cache.current().number(),
                    "identity refresh failed, keeping current list"
                );
                retry_delay
            }
        };

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                debug!("identity refresher shutting down");
                return;
            }

            _ = tokio::time::sleep(wait) => {}
        }
    }
}

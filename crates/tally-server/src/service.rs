//! Service assembly: background loops plus the management API.

use std::sync::Arc;
use std::time::Duration;

use tally_agent::{CounterStore, HttpTrafficSink, Reconciler, TrafficSink};
use tally_auth::{HttpIdentitySource, IdentityCache, IdentitySource, run_refresher};
use tally_config::Config;
use tally_core::{DEFAULT_SHUTDOWN_TIMEOUT_SECS, PanelEndpoint};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::accountant::Accountant;
use crate::api;
use crate::error::ServerError;

/// A configured accounting service.
///
/// Hosts take the [`Accountant`] for their per-connection callbacks and run
/// the service in the background.
pub struct Service {
    config: Config,
    accountant: Accountant,
    source: Arc<dyn IdentitySource>,
    sink: Arc<dyn TrafficSink>,
}

impl Service {
    /// Build a service talking to the panel over HTTP.
    pub fn new(config: Config) -> Self {
        let endpoint = PanelEndpoint::new(
            config.panel.api_host.as_str(),
            config.panel.api_key.as_str(),
            config.panel.node_id,
            config.panel.node_type.as_str(),
        );
        let source = Arc::new(HttpIdentitySource::new(endpoint.clone()));
        let sink = Arc::new(HttpTrafficSink::new(
            endpoint,
            Duration::from_secs(config.reconcile.push_timeout_secs),
        ));
        Self::with_backends(config, source, sink)
    }

    /// Build a service with custom identity source and traffic sink.
    pub fn with_backends(
        config: Config,
        source: Arc<dyn IdentitySource>,
        sink: Arc<dyn TrafficSink>,
    ) -> Self {
        let accountant = Accountant::new(Arc::new(IdentityCache::new()), CounterStore::new())
            .with_drop_removed_identities(config.accounting.drop_removed_identities);
        Self {
            config,
            accountant,
            source,
            sink,
        }
    }

    pub fn accountant(&self) -> Accountant {
        self.accountant.clone()
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Returns an error if the management API cannot be served; the
    /// background loops are stopped first.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        let identity = &self.config.identity;
        let reconcile = &self.config.reconcile;

        let refresher = tokio::spawn(run_refresher(
            self.accountant.identities().clone(),
            self.source.clone(),
            Duration::from_secs(identity.refresh_interval_secs),
            Duration::from_secs(identity.retry_delay_secs),
            shutdown.clone(),
        ));

        let reconciler = Reconciler::new(self.accountant.store().clone(), self.sink.clone())
            .with_max_pending_keys(reconcile.max_pending_keys);
        let push_interval = Duration::from_secs(reconcile.push_interval_secs);
        let flusher = tokio::spawn({
            let shutdown = shutdown.clone();
            async move { reconciler.run(push_interval, shutdown).await }
        });

        let api_result = match &self.config.api.listen {
            Some(listen) => {
                let router = api::api_routes(
                    self.accountant.store().clone(),
                    self.config.api.secret.clone(),
                );
                let result = api::serve(listen, router, shutdown.clone()).await;
                if let Err(e) = &result {
                    error!(error = %e, "management API failed");
                    shutdown.cancel();
                }
                result
            }
            None => {
                shutdown.cancelled().await;
                Ok(())
            }
        };

        let grace_secs = reconcile.push_timeout_secs.max(DEFAULT_SHUTDOWN_TIMEOUT_SECS);
        let grace = Duration::from_secs(grace_secs);
        let drain = async {
            if let Err(e) = refresher.await {
                warn!(error = %e, "identity refresher task failed");
            }
            if let Err(e) = flusher.await {
                warn!(error = %e, "reconciler task failed");
            }
        };
        match tokio::time::timeout(grace, drain).await {
            Ok(()) => info!("service stopped"),
            Err(_) => warn!(grace_secs, "background tasks did not stop in time"),
        }
        api_result
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("accountant", &self.accountant)
            .field("api_listen", &self.config.api.listen)
            .finish_non_exhaustive()
    }
}

//! Accounting facade over the identity cache and counter store.

use std::sync::Arc;

use tally_agent::{CounterStore, Recorded};
use tally_auth::IdentityCache;
use tracing::{debug, trace};

use crate::traits::{Authenticator, TrafficLogger};

/// Host-facing accounting entry point.
///
/// Both operations are synchronous and only touch in-memory state.
#[derive(Debug, Clone)]
pub struct Accountant {
    identities: Arc<IdentityCache>,
    store: CounterStore,
    drop_removed_identities: bool,
}

impl Accountant {
    pub fn new(identities: Arc<IdentityCache>, store: CounterStore) -> Self {
        Self {
            identities,
            store,
            drop_removed_identities: false,
        }
    }

    /// Reject traffic for keys that are not in the current identity list.
    pub fn with_drop_removed_identities(mut self, enabled: bool) -> Self {
        self.drop_removed_identities = enabled;
        self
    }

    /// Resolve a credential to its identity key.
    pub fn authenticate(&self, credential: &str) -> Option<String> {
        let key = self
            .identities
            .lookup(credential)
            .map(|record| record.key.clone());
        tally_metrics::record_auth(key.is_some());
        if key.is_none() {
            debug!("unknown credential rejected");
        }
        key
    }

    /// Account traffic; `false` tells the host to disconnect.
    pub fn on_traffic(&self, key: &str, tx: u64, rx: u64) -> bool {
        let outcome = if self.drop_removed_identities {
            self.store
                .record_with(key, tx, rx, |k| self.identities.contains_key(k))
        } else {
            self.store.record_with(key, tx, rx, |_| true)
        };

        match outcome {
            Recorded::Counted => {
                trace!(key, tx, rx, "traffic counted");
                true
            }
            Recorded::Kicked => {
                tally_metrics::record_traffic_rejected("kicked");
                debug!(key, "kicked identity disconnected");
                false
            }
            Recorded::Refused => {
                tally_metrics::record_traffic_rejected("unknown_identity");
                debug!(key, "traffic for removed identity rejected");
                false
            }
        }
    }

    pub fn store(&self) -> &CounterStore {
        &self.store
    }

    pub fn identities(&self) -> &Arc<IdentityCache> {
        &self.identities
    }
}

impl Authenticator for Accountant {
    fn authenticate(&self, credential: &str) -> Option<String> {
        Accountant::authenticate(self, credential)
    }
}

impl TrafficLogger for Accountant {
    fn log_traffic(&self, key: &str, tx: u64, rx: u64) -> bool {
        self.on_traffic(key, tx, rx)
    }
}

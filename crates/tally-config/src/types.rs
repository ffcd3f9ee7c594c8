//! Configuration type definitions for the panel, identity refresh,
//! reconciliation, management API, metrics and logging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub panel: PanelConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub accounting: AccountingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection details for the billing panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Panel base URL, e.g. `https://panel.example.com`.
    pub api_host: String,
    /// Shared node token issued by the panel.
    pub api_key: String,
    /// Node identifier registered in the panel.
    pub node_id: u32,
    /// Node type reported with every request.
    #[serde(default = "default_node_type")]
    pub node_type: String,
}

/// Identity list refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Seconds between refreshes. Also bounds each fetch.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Seconds to wait before retrying a failed fetch.
    #[serde(default = "default_refresh_retry_secs")]
    pub retry_delay_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            retry_delay_secs: default_refresh_retry_secs(),
        }
    }
}

/// Traffic push settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default = "default_push_interval_secs")]
    pub push_interval_secs: u64,
    #[serde(default = "default_push_timeout_secs")]
    pub push_timeout_secs: u64,
    /// Upper bound on distinct keys kept after a failed push (None = unbounded).
    #[serde(default)]
    pub max_pending_keys: Option<usize>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            push_interval_secs: default_push_interval_secs(),
            push_timeout_secs: default_push_timeout_secs(),
            max_pending_keys: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountingConfig {
    /// Reject traffic for keys missing from the current identity generation.
    #[serde(default = "default_drop_removed_identities")]
    pub drop_removed_identities: bool,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            drop_removed_identities: default_drop_removed_identities(),
        }
    }
}

/// Management API (traffic query + kick).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// Listen address. The API is disabled when unset.
    #[serde(default)]
    pub listen: Option<String>,
    /// Value expected in the `Authorization` header. No check when unset.
    #[serde(default)]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsConfig {
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Output format: pretty (default), json, compact.
    #[serde(default)]
    pub format: Option<String>,
    /// Output target: stderr (default), stdout.
    #[serde(default)]
    pub output: Option<String>,
    /// Per-module level overrides, e.g. `tally_agent = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, String>,
}

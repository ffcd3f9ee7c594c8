//! # tally
//!
//! Traffic accounting side-car for proxy servers: authenticates clients
//! against a panel-supplied identity list, meters per-identity traffic and
//! reconciles the counters with the panel.
//!
//! ## Crates
//!
//! - [`tally_core`] - Shared constants and panel addressing
//! - [`tally_config`] - Configuration loading and validation
//! - [`tally_metrics`] - Prometheus-compatible metrics
//! - [`tally_auth`] - Identity cache and refresher
//! - [`tally_agent`] - Counter store and reconciler
//! - [`tally_server`] - Accounting facade, management API, service runner

pub use tally_agent as agent;
pub use tally_auth as auth;
pub use tally_config as config;
pub use tally_core as core;
pub use tally_metrics as metrics;
pub use tally_server as server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tally_agent::{CounterStore, Reconciler, TrafficSink};
    pub use tally_auth::{IdentityCache, IdentityRecord, IdentitySource};
    pub use tally_server::{Accountant, Authenticator, Service, TrafficLogger};
}

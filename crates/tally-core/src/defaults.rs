//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Panel Defaults
// ============================================================================

/// Node type reported to the panel on every request.
pub const DEFAULT_NODE_TYPE: &str = "hysteria";
/// Path of the identity list endpoint, relative to the panel host.
pub const USER_LIST_PATH: &str = "/api/v1/server/UniProxy/user";
/// Path of the traffic push endpoint, relative to the panel host.
pub const TRAFFIC_PUSH_PATH: &str = "/api/v1/server/UniProxy/push";

// ============================================================================
// Identity Refresh Defaults
// ============================================================================

/// Interval between identity list refreshes (also the fetch timeout).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
/// Delay before retrying after a failed identity fetch.
pub const DEFAULT_REFRESH_RETRY_SECS: u64 = 15;

// ============================================================================
// Reconcile Defaults
// ============================================================================

/// Interval between traffic pushes.
pub const DEFAULT_PUSH_INTERVAL_SECS: u64 = 60;
/// Timeout for a single traffic push.
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Accounting Defaults
// ============================================================================

/// Reject traffic from identities that disappeared in the last refresh.
pub const DEFAULT_DROP_REMOVED_IDENTITIES: bool = false;

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default log format (pretty, json, compact).
pub const DEFAULT_LOG_FORMAT: &str = "pretty";
/// Default log output (stdout, stderr).
pub const DEFAULT_LOG_OUTPUT: &str = "stderr";

// ============================================================================
// Shutdown Defaults
// ============================================================================

/// Upper bound on the final flush performed during shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

//! Metrics collection and Prometheus exporter for tally.
//!
//! Recording functions are cheap no-ops until a recorder is installed, so
//! library crates call them unconditionally.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Starts an HTTP server on the given address to expose metrics.
/// Returns an error message if binding fails.
pub fn init_prometheus(listen: &str) -> Result<(), String> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("invalid metrics listen address: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install prometheus exporter: {}", e))?;

    Ok(())
}

// ============================================================================
// Metric Names
// ============================================================================

/// Number of identities in the installed generation.
pub const IDENTITIES: &str = "tally_identities";
/// Identity refresh attempts by result.
pub const IDENTITY_REFRESH_TOTAL: &str = "tally_identity_refresh_total";
/// Authentication attempts by result.
pub const AUTH_TOTAL: &str = "tally_auth_total";
/// Traffic flush attempts by result ("ok", "error", "idle").
pub const FLUSH_TOTAL: &str = "tally_flush_total";
/// Bytes acknowledged by the panel, by direction.
pub const FLUSHED_BYTES_TOTAL: &str = "tally_flushed_bytes_total";
/// Snapshot entries merged back after a failed flush.
pub const ROLLBACK_ENTRIES_TOTAL: &str = "tally_rollback_entries_total";
/// Snapshot entries dropped because the pending-key cap was reached.
pub const ROLLBACK_DROPPED_TOTAL: &str = "tally_rollback_dropped_total";
/// Traffic events rejected, by reason ("kicked", "unknown_identity").
pub const TRAFFIC_REJECTED_TOTAL: &str = "tally_traffic_rejected_total";
/// Kick markers placed.
pub const KICKS_TOTAL: &str = "tally_kicks_total";
/// Errors from panel calls, by type.
pub const ERRORS_TOTAL: &str = "tally_errors_total";

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record the size of a newly installed identity generation.
#[inline]
pub fn set_identities(count: usize) {
    gauge!(IDENTITIES).set(count as f64);
}

/// Record an identity refresh outcome ("ok" or "error").
#[inline]
pub fn record_identity_refresh(result: &'static str) {
    counter!(IDENTITY_REFRESH_TOTAL, "result" => result).increment(1);
}

/// Record an authentication decision.
#[inline]
pub fn record_auth(accepted: bool) {
    let result = if accepted { "accepted" } else { "rejected" };
    counter!(AUTH_TOTAL, "result" => result).increment(1);
}

/// Record a flush outcome ("ok", "error" or "idle").
#[inline]
pub fn record_flush(result: &'static str) {
    counter!(FLUSH_TOTAL, "result" => result).increment(1);
}

/// Record bytes the panel acknowledged.
#[inline]
pub fn record_flushed_bytes(tx: u64, rx: u64) {
    counter!(FLUSHED_BYTES_TOTAL, "direction" => "tx").increment(tx);
    counter!(FLUSHED_BYTES_TOTAL, "direction" => "rx").increment(rx);
}

/// Record a rollback merge.
#[inline]
pub fn record_rollback(merged: usize, dropped: usize) {
    counter!(ROLLBACK_ENTRIES_TOTAL).increment(merged as u64);
    if dropped > 0 {
        counter!(ROLLBACK_DROPPED_TOTAL).increment(dropped as u64);
    }
}

/// Record a rejected traffic event.
#[inline]
pub fn record_traffic_rejected(reason: &'static str) {
    counter!(TRAFFIC_REJECTED_TOTAL, "reason" => reason).increment(1);
}

/// Record an error by type.
#[inline]
pub fn record_error(error_type: &'static str) {
    counter!(ERRORS_TOTAL, "type" => error_type).increment(1);
}

/// Record kick markers placed.
#[inline]
pub fn record_kicks(count: usize) {
    counter!(KICKS_TOTAL).increment(count as u64);
}

// ============================================================================
// Error Type Constants (re-exported from tally-core)
// ============================================================================

pub use tally_core::{ERROR_CONFIG, ERROR_DECODE, ERROR_ENCODE, ERROR_IO, ERROR_TRANSPORT};

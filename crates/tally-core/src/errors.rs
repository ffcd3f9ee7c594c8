//! Error type constants for metrics and logging.
//!
//! These constants provide consistent error classification across all crates.

/// Network, timeout or non-success status from the panel.
pub const ERROR_TRANSPORT: &str = "transport";
/// Response body could not be decoded.
pub const ERROR_DECODE: &str = "decode";
/// Request body could not be encoded.
pub const ERROR_ENCODE: &str = "encode";
/// I/O error.
pub const ERROR_IO: &str = "io";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";

//! Identity source error types.

use std::time::Duration;

use tally_core::{ERROR_DECODE, ERROR_TRANSPORT};

/// Error fetching the identity list.
///
/// All variants are transient: the refresher logs them and keeps the
/// previously installed generation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Network failure talking to the panel.
    #[error("transport: {0}")]
    Transport(String),

    /// Panel answered with a non-success status.
    #[error("panel returned HTTP {0}")]
    Status(u16),

    /// Response body was not a valid identity list.
    #[error("decode: {0}")]
    Decode(String),

    /// Fetch did not complete within the refresh interval.
    #[error("identity fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl AuthError {
    /// Create a transport error from any error type.
    #[inline]
    pub fn transport<E: std::fmt::Display>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create a decode error from any error type.
    #[inline]
    pub fn decode<E: std::fmt::Display>(err: E) -> Self {
        Self::Decode(err.to_string())
    }

    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            AuthError::Transport(_) | AuthError::Status(_) | AuthError::Timeout(_) => {
                ERROR_TRANSPORT
            }
            AuthError::Decode(_) => ERROR_DECODE,
        }
    }
}

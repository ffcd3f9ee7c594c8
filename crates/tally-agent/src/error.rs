//! Agent error types.

use std::time::Duration;

use tally_core::{ERROR_ENCODE, ERROR_TRANSPORT};

/// Error pushing traffic to the panel.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("transport: {0}")]
    Transport(String),

    #[error("panel returned HTTP {0}")]
    Status(u16),

    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("traffic push timed out after {0:?}")]
    Timeout(Duration),
}

impl AgentError {
    #[inline]
    pub fn transport<E: std::fmt::Display>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            AgentError::Encode(_) => ERROR_ENCODE,
            AgentError::Transport(_) | AgentError::Status(_) | AgentError::Timeout(_) => {
                ERROR_TRANSPORT
            }
        }
    }
}

//! Server error types.

use tally_config::ConfigError;
use tally_metrics::{ERROR_CONFIG, ERROR_IO};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    /// The Prometheus exporter could not be installed.
    #[error("metrics: {0}")]
    Metrics(String),
}

impl ServerError {
    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Io(_) | ServerError::Metrics(_) => ERROR_IO,
            ServerError::Config(_) => ERROR_CONFIG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_types() {
        let io = ServerError::from(std::io::Error::other("bind"));
        assert_eq!(io.error_type(), ERROR_IO);
        let cfg = ServerError::from(ConfigError::Validation("bad".into()));
        assert_eq!(cfg.error_type(), ERROR_CONFIG);
        assert_eq!(cfg.to_string(), "config: validation: bad");
    }
}

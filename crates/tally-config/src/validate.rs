//! Configuration validation logic.

use crate::Config;
use crate::loader::ConfigError;

const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];
const LOG_OUTPUTS: [&str; 2] = ["stderr", "stdout"];

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let host = config.panel.api_host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation("panel.api_host is empty".into()));
    }
    if !host.starts_with("http://") && !host.starts_with("https://") {
        return Err(ConfigError::Validation(
            "panel.api_host must start with http:// or https://".into(),
        ));
    }
    if config.panel.api_key.trim().is_empty() {
        return Err(ConfigError::Validation("panel.api_key is empty".into()));
    }
    if config.panel.node_type.trim().is_empty() {
        return Err(ConfigError::Validation("panel.node_type is empty".into()));
    }
    if config.identity.refresh_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "identity.refresh_interval_secs must be > 0".into(),
        ));
    }
    if config.identity.retry_delay_secs == 0 {
        return Err(ConfigError::Validation(
            "identity.retry_delay_secs must be > 0".into(),
        ));
    }
    if config.reconcile.push_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "reconcile.push_interval_secs must be > 0".into(),
        ));
    }
    if config.reconcile.push_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "reconcile.push_timeout_secs must be > 0".into(),
        ));
    }
    // A push outliving its tick would let the next tick fire mid-flight.
    if config.reconcile.push_timeout_secs > config.reconcile.push_interval_secs {
        return Err(ConfigError::Validation(
            "reconcile.push_timeout_secs must be <= reconcile.push_interval_secs".into(),
        ));
    }
    if config.reconcile.max_pending_keys == Some(0) {
        return Err(ConfigError::Validation(
            "reconcile.max_pending_keys must be > 0 when set".into(),
        ));
    }
    if let Some(ref listen) = config.api.listen
        && listen.trim().is_empty()
    {
        return Err(ConfigError::Validation("api.listen is empty".into()));
    }
    if let Some(ref format) = config.logging.format
        && !LOG_FORMATS.contains(&format.as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.format must be one of: {:?}",
            LOG_FORMATS
        )));
    }
    if let Some(ref output) = config.logging.output
        && !LOG_OUTPUTS.contains(&output.as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.output must be one of: {:?}",
            LOG_OUTPUTS
        )));
    }
    Ok(())
}

//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override panel base URL, e.g. https://panel.example.com
    #[arg(long)]
    pub api_host: Option<String>,
    /// Override panel node token
    #[arg(long)]
    pub api_key: Option<String>,
    /// Override panel node id
    #[arg(long)]
    pub node_id: Option<u32>,
    /// Override identity refresh interval (seconds)
    #[arg(long)]
    pub refresh_interval_secs: Option<u64>,
    /// Override traffic push interval (seconds)
    #[arg(long)]
    pub push_interval_secs: Option<u64>,
    /// Override traffic push timeout (seconds)
    #[arg(long)]
    pub push_timeout_secs: Option<u64>,
    /// Override management API listen address (empty string disables it)
    #[arg(long)]
    pub api_listen: Option<String>,
    /// Override management API secret
    #[arg(long)]
    pub api_secret: Option<String>,
    /// Override metrics listen address
    #[arg(long)]
    pub metrics_listen: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override log format (pretty/json/compact)
    #[arg(long)]
    pub log_format: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.api_host {
        config.panel.api_host = v.clone();
    }
    if let Some(v) = &overrides.api_key {
        config.panel.api_key = v.clone();
    }
    if let Some(v) = overrides.node_id {
        config.panel.node_id = v;
    }
    if let Some(v) = overrides.refresh_interval_secs {
        config.identity.refresh_interval_secs = v;
    }
    if let Some(v) = overrides.push_interval_secs {
        config.reconcile.push_interval_secs = v;
    }
    if let Some(v) = overrides.push_timeout_secs {
        config.reconcile.push_timeout_secs = v;
    }
    if let Some(v) = &overrides.api_listen {
        config.api.listen = if v.is_empty() { None } else { Some(v.clone()) };
    }
    if let Some(v) = &overrides.api_secret {
        config.api.secret = Some(v.clone());
    }
    if let Some(v) = &overrides.metrics_listen {
        config.metrics.listen = Some(v.clone());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = &overrides.log_format {
        config.logging.format = Some(v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        toml::from_str(
            "[panel]\napi_host = \"https://p.example\"\napi_key = \"k\"\nnode_id = 1\n\n[api]\nlisten = \"127.0.0.1:1\"\n",
        )
        .unwrap()
    }

    #[test]
    fn overrides_replace_values() {
        let mut cfg = base();
        let overrides = CliOverrides {
            api_host: Some("https://other.example".into()),
            node_id: Some(9),
            push_interval_secs: Some(5),
            log_level: Some("debug".into()),
            ..CliOverrides::default()
        };
        apply_overrides(&mut cfg, &overrides);
        assert_eq!(cfg.panel.api_host, "https://other.example");
        assert_eq!(cfg.panel.node_id, 9);
        assert_eq!(cfg.reconcile.push_interval_secs, 5);
        assert_eq!(cfg.logging.level.as_deref(), Some("debug"));
        // untouched
        assert_eq!(cfg.panel.api_key, "k");
    }

    #[test]
    fn empty_api_listen_disables_api() {
        let mut cfg = base();
        let overrides = CliOverrides {
            api_listen: Some(String::new()),
            ..CliOverrides::default()
        };
        apply_overrides(&mut cfg, &overrides);
        assert!(cfg.api.listen.is_none());
    }
}

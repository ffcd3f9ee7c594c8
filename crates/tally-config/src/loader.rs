//! Configuration file loading and error types.

use std::{fs, path::Path};

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format")]
    UnsupportedFormat,
    #[error("validation: {0}")]
    Validation(String),
}

/// Load a config file, picking the parser from the file extension.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
        "json" => Ok(serde_json::from_str(&data)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&data)?),
        "toml" => Ok(toml::from_str(&data)?),
        _ => Err(ConfigError::UnsupportedFormat),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_toml() {
        let file = write_temp(
            ".toml",
            "[panel]\napi_host = \"https://p.example\"\napi_key = \"k\"\nnode_id = 1\n",
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.panel.api_host, "https://p.example");
    }

    #[test]
    fn load_json() {
        let file = write_temp(
            ".json",
            r#"{"panel":{"api_host":"https://p.example","api_key":"k","node_id":2}}"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.panel.node_id, 2);
    }

    #[test]
    fn load_yaml() {
        let file = write_temp(
            ".yaml",
            "panel:\n  api_host: https://p.example\n  api_key: k\n  node_id: 4\n",
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.panel.node_id, 4);
    }

    #[test]
    fn unknown_extension_rejected() {
        let file = write_temp(".ini", "panel=1");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_config("/nonexistent/tally.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}

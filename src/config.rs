use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::normalize::NormalizeConfig;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: String::from("http://localhost:8000/api"),
            timeout_secs: 30,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:8000/api"
timeout_secs = 30

[normalize]
backend_key = "_id"
frontend_key = "id"
items_field = "items"
total_count_field = "total_count"
"#;

impl Config {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration")
    }

    /// Load configuration
    ///
    /// Search order:
    /// 1. The explicit path, if given (must exist)
    /// 2. `config.toml` next to the executable
    /// 3. The embedded default
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let config_path = exe_dir.join("config.toml");
                if config_path.exists() {
                    tracing::info!("Loading config from: {}", config_path.display());
                    return Self::from_file(&config_path);
                }
                tracing::debug!("config.toml not found at: {}", config_path.display());
            }
        }

        tracing::debug!("Using default embedded configuration");
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config = Config::from_toml_str(
            r#"
            [normalize]
            backend_key = "uuid"
            "#,
        )
        .unwrap();

        assert_eq!(config.normalize.backend_key, "uuid");
        assert_eq!(config.normalize.frontend_key, "id");
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_invalid_config_is_error() {
        assert!(Config::from_toml_str("[api]\ntimeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let missing = std::env::temp_dir().join("anvil-no-such-config.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}

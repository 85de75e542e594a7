//! CLI configuration file.
//!
//! ```yaml
//! log_level: debug
//! list:
//!   default_limit: 25
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use resquery::ListConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub list: ListConfig,
    /// `EnvFilter` directive used when neither `RUST_LOG` nor `-v` is given.
    pub log_level: Option<String>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(CliConfig::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config() {
        let config = CliConfig::from_yaml("log_level: debug\nlist:\n  default_limit: 25\n").unwrap();
        assert_eq!(config.list.default_limit(), 25);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = CliConfig::from_yaml("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.list.default_limit(), 10);
    }

    #[test]
    fn bad_type_is_an_error() {
        assert!(CliConfig::from_yaml("list:\n  default_limit: many\n").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = CliConfig::load(Path::new("/nonexistent/resquery.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}

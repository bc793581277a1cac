//! Application configuration management

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{BoardsError, Result};
use crate::platform::HostPlatform;
use crate::storage::RonFileStorage;
use crate::utils::logging::level_from_name;

/// Main application configuration, read from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where board selections and cached options are persisted
    pub state_file: Option<PathBuf>,
    /// Serial port polling interval in milliseconds
    pub scan_interval_ms: u64,
    /// Override the detected host platform for board port detection
    pub platform: Option<HostPlatform>,
    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            scan_interval_ms: 1000,
            platform: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BoardsError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan_interval_ms == 0 {
            return Err(BoardsError::Config(
                "scan_interval_ms must be greater than zero".to_string(),
            ));
        }
        if level_from_name(&self.log_level).is_none() {
            return Err(BoardsError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(RonFileStorage::default_path)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform.unwrap_or_else(HostPlatform::current)
    }

    pub fn level_filter(&self) -> LevelFilter {
        level_from_name(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::from_toml("platform = \"linux\"\n").unwrap();
        assert_eq!(config.platform(), HostPlatform::Linux);
        assert_eq!(config.scan_interval(), Duration::from_millis(1000));
        assert_eq!(config.level_filter(), LevelFilter::Info);
        assert!(config.state_file.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AppConfig::from_toml("scan_interval_ms = 0").is_err());
        assert!(AppConfig::from_toml("log_level = \"loud\"").is_err());
        assert!(matches!(
            AppConfig::from_toml("scan_interval_ms = \"fast\""),
            Err(BoardsError::Config(_))
        ));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = AppConfig {
            state_file: Some(PathBuf::from("/tmp/boardsync/state.ron")),
            platform: Some(HostPlatform::MacOs),
            ..AppConfig::default()
        };
        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("boardsync.toml"))
            .await
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }
}

use chrono::Duration;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{NormalizeError, Result};

/// Environment variable naming the config file when no path is given
pub const CONFIG_PATH_ENV: &str = "QUAKE_FEED_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name: "quake_feed.log".to_string(),
            default_filter: "quake_feed=info".to_string(),
        }
    }
}

/// Query-side knobs for assembling the index feed
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// How far back the feed reaches
    pub window_hours: i64,
    /// Felt reports at or below this confidence never reach the feed
    pub min_felt_confidence: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            window_hours: 72,
            min_felt_confidence: 0.9,
        }
    }
}

impl Config {
    /// Load from an explicit path, `$QUAKE_FEED_CONFIG`, or `config.toml`.
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(Path::new(&env_path));
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            NormalizeError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.feed.window_hours <= 0 || Duration::try_hours(self.feed.window_hours).is_none() {
            return Err(NormalizeError::Config(format!(
                "feed.window_hours must be a positive number of hours, got {}",
                self.feed.window_hours
            )));
        }
        if !(0.0..=1.0).contains(&self.feed.min_felt_confidence) {
            return Err(NormalizeError::Config(format!(
                "feed.min_felt_confidence must be within 0..=1, got {}",
                self.feed.min_felt_confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[feed]\nwindow_hours = 24\n").unwrap();
        assert_eq!(config.feed.window_hours, 24);
        assert_eq!(config.feed.min_felt_confidence, 0.9);
        assert_eq!(config.logging.directory, "logs");
    }

    #[test]
    fn test_validate_rejects_bad_window() {
        let mut config = Config::default();
        config.feed.window_hours = 0;
        assert!(config.validate().is_err());

        config.feed.window_hours = i64::MAX;
        assert!(config.validate().is_err());

        config.feed.window_hours = 24 * 365;
        assert!(config.validate().is_ok());
    }
}

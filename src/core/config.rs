//! TOML configuration file parsing and loading
//!
//! This module handles loading and parsing of the broker's TOML configuration,
//! including default config file discovery and validation of config values.
//! Every section and field is optional; missing values fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::logging::LogFormat;
use crate::queue::DEFAULT_DRAIN_TIMEOUT_MS;

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// Default timeouts applied to queues built with `Queue::with_config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    /// Fetch timeout in milliseconds, 0 blocks forever
    pub timeout_ms: u32,
    /// Upper bound on the safe-unrelate drain wait
    pub drain_timeout_ms: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 0,
            drain_timeout_ms: DEFAULT_DRAIN_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<PathBuf>,
    /// None means auto-detect from the terminal
    pub color: Option<bool>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file: None,
            color: None,
        }
    }
}

/// Parameters for the `soak` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoakConfig {
    pub producers: usize,
    pub consumers: usize,
    pub messages: u64,
    pub topics: Vec<String>,
    pub queues_per_topic: usize,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            producers: 2,
            consumers: 2,
            messages: 10_000,
            topics: vec!["soak".to_string()],
            queues_per_topic: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrokerConfig {
    pub queue: QueueConfig,
    pub logging: LoggingConfig,
    pub soak: SoakConfig,
}

/// `<config dir>/relaymq/relaymq.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("relaymq").join("relaymq.toml"))
}

impl BrokerConfig {
    /// Load configuration from `path`, or from the default location
    ///
    /// An explicitly given file must exist. A missing default file is not an
    /// error and yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Some(path.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match config_path {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let config: BrokerConfig = toml::from_str(&contents)
                    .map_err(|source| ConfigError::Parse { path, source })?;
                config.validate()?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: BrokerConfig =
            toml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|e| format!("# unserializable: {}", e))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(invalid(
                "logging.level",
                format!("'{}' is not one of {:?}", self.logging.level, LOG_LEVELS),
            ));
        }
        if self.logging.format.parse::<LogFormat>().is_err() {
            return Err(invalid(
                "logging.format",
                format!(
                    "'{}' is not one of {:?}",
                    self.logging.format,
                    LogFormat::names()
                ),
            ));
        }
        if self.soak.producers == 0 {
            return Err(invalid("soak.producers", "must be at least 1"));
        }
        if self.soak.consumers == 0 {
            return Err(invalid("soak.consumers", "must be at least 1"));
        }
        if self.soak.queues_per_topic == 0 {
            return Err(invalid("soak.queues_per_topic", "must be at least 1"));
        }
        if self.soak.topics.is_empty() || self.soak.topics.iter().any(|t| t.trim().is_empty()) {
            return Err(invalid("soak.topics", "must list at least one non-empty topic"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.into(),
    }
}

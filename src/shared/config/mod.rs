//! Application configuration module
//!
//! Provides the settings that shape how the offline cache reacts to the
//! native collaborator. Values can be built in code or read from TOML:
//!
//! ```toml
//! [reconnect]
//! show_message = true
//!
//! [sync]
//! stall_timeout_secs = 120
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Longest accepted sync stall timeout (one week)
pub const MAX_SYNC_STALL_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 3600);

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Raise the blocking "reconnecting" prompt when Wi-Fi drops
    pub show_reconnecting_message: bool,
    /// Give up waiting for a terminating sync event after this long
    pub sync_stall_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_reconnecting_message: true,
            sync_stall_timeout: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Builder seeded with these values
    pub fn into_builder(self) -> AppConfigBuilder {
        AppConfigBuilder {
            show_reconnecting_message: Some(self.show_reconnecting_message),
            sync_stall_timeout: self.sync_stall_timeout,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync_stall_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidValue {
                key: "sync.stall_timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.sync_stall_timeout.is_some_and(|timeout| timeout > MAX_SYNC_STALL_TIMEOUT) {
            return Err(ConfigError::InvalidValue {
                key: "sync.stall_timeout_secs",
                message: format!("must be at most {} seconds", MAX_SYNC_STALL_TIMEOUT.as_secs()),
            });
        }
        Ok(())
    }

    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        file.into_builder().build()
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    show_reconnecting_message: Option<bool>,
    sync_stall_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set whether the reconnect prompt is raised
    pub fn show_reconnecting_message(mut self, show: bool) -> Self {
        self.show_reconnecting_message = Some(show);
        self
    }

    /// Set the sync stall timeout
    pub fn sync_stall_timeout(mut self, timeout: Duration) -> Self {
        self.sync_stall_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            show_reconnecting_message: self.show_reconnecting_message.unwrap_or(true),
            sync_stall_timeout: self.sync_stall_timeout,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    reconnect: ReconnectSection,
    #[serde(default)]
    sync: SyncSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReconnectSection {
    show_message: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SyncSection {
    stall_timeout_secs: Option<u64>,
}

impl ConfigFile {
    fn into_builder(self) -> AppConfigBuilder {
        let mut builder = AppConfig::builder();
        if let Some(show) = self.reconnect.show_message {
            builder = builder.show_reconnecting_message(show);
        }
        if let Some(secs) = self.sync.stall_timeout_secs {
            builder = builder.sync_stall_timeout(Duration::from_secs(secs));
        }
        builder
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("could not read {path}: {message}")]
    Io { path: String, message: String },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

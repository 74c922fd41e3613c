use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::sync::StallPolicy;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Path of the TOML file to load instead of the default location
pub const ENV_CONFIG_PATH: &str = "NOITON_CONFIG";
/// `1`/`true`/`yes` or `0`/`false`/`no`
pub const ENV_SHOW_RECONNECTING: &str = "NOITON_SHOW_RECONNECTING";
/// Stall timeout in whole seconds
pub const ENV_SYNC_STALL_SECS: &str = "NOITON_SYNC_STALL_SECS";

/// Offline cache configuration: file settings plus environment overrides.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("invalid offline cache configuration, using defaults: {}", e);
            Self {
                app: AppConfig::default(),
                source: None,
            }
        })
    }
}

impl Config {
    /// Load from `NOITON_CONFIG` or the default path, then apply env overrides.
    ///
    /// A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .or_else(Self::default_path);

        match path {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self {
                app: apply_env(AppConfig::builder())?,
                source: None,
            }),
        }
    }

    /// Load a specific file, then apply env overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = AppConfig::from_file(path)?;
        Ok(Self {
            app: apply_env(file.into_builder())?,
            source: Some(path.to_path_buf()),
        })
    }

    /// Build from code only; the environment is ignored
    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
            source: None,
        })
    }

    /// `<config dir>/noiton/offline.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("noiton").join("offline.toml"))
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// File the settings came from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn show_reconnecting_message(&self) -> bool {
        self.app.show_reconnecting_message
    }

    pub fn stall_policy(&self) -> StallPolicy {
        StallPolicy::from_config(&self.app)
    }
}

fn apply_env(mut builder: AppConfigBuilder) -> Result<AppConfig, ConfigError> {
    if let Ok(value) = std::env::var(ENV_SHOW_RECONNECTING) {
        builder = builder.show_reconnecting_message(parse_flag(ENV_SHOW_RECONNECTING, &value)?);
    }
    if let Ok(value) = std::env::var(ENV_SYNC_STALL_SECS) {
        let secs = value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
            key: ENV_SYNC_STALL_SECS,
            message: e.to_string(),
        })?;
        builder = builder.sync_stall_timeout(Duration::from_secs(secs));
    }
    builder.build()
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key,
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}

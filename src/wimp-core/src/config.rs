//! `config.toml`: the plugin's own knobs, as opposed to the host-owned
//! settings in [`crate::settings`].
//!
//! ```toml
//! addon_id = "plugin.audio.wimp"
//!
//! [api]
//! base_url = "http://127.0.0.1:9000/v1/"   # optional, defaults per site
//! page_size = 100
//!
//! [logging]
//! level = "debug"
//! stdout = true
//! ```

use crate::paths::{AppDirs, DirsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const CURRENT_CONFIG_VERSION: u32 = 1;

pub const DEFAULT_ADDON_ID: &str = "plugin.audio.wimp";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub config_version: u32,
    /// Authority part of every `plugin://` URL the router produces.
    pub addon_id: String,
    /// Where the session settings live; see [`AppDirs::settings_file`].
    pub settings_path: Option<PathBuf>,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION,
            addon_id: DEFAULT_ADDON_ID.to_string(),
            settings_path: None,
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Replaces the site's base URL (test servers, proxies).
    pub base_url: Option<String>,
    /// Replaces the site's application token.
    pub token: Option<String>,
    pub timeout_seconds: u64,
    /// Items requested per page when walking paginated listings.
    pub page_size: u32,
    /// Upper bound on items collected for one listing.
    pub max_items: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_seconds: 20,
            page_size: 100,
            max_items: 9999,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Daily log files kept around; older ones are deleted at startup.
    pub max_log_files: usize,
    /// Mirror log lines to stderr. Stdout belongs to the host.
    pub stdout: bool,
    pub file_name: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            max_log_files: 7,
            stdout: false,
            file_name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid config: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Directories(#[from] DirsError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unsupported config_version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("addon_id must be a bare host name, got {0:?}")]
    InvalidAddonId(String),
    #[error("api.base_url must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),
    #[error("api.page_size must be greater than zero")]
    ZeroPageSize,
    #[error("api.timeout_seconds must be greater than zero")]
    ZeroTimeout,
}

impl Config {
    /// `config.toml` from the config dir, defaults when there is none.
    pub fn load_or_default(dirs: &AppDirs) -> Result<Self, ConfigError> {
        dirs.ensure_exists()?;
        Self::load_from(&dirs.config_file())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.config_version != CURRENT_CONFIG_VERSION {
            return Err(ValidationError::UnsupportedVersion {
                found: self.config_version,
                expected: CURRENT_CONFIG_VERSION,
            });
        }

        let bad_addon_char = |c: char| matches!(c, '/' | ':' | '?' | '#') || c.is_whitespace();
        if self.addon_id.is_empty() || self.addon_id.contains(bad_addon_char) {
            return Err(ValidationError::InvalidAddonId(self.addon_id.clone()));
        }

        if let Some(base_url) = &self.api.base_url {
            let lower = base_url.to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(ValidationError::InvalidBaseUrl(base_url.clone()));
            }
        }
        if self.api.page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        if self.api.timeout_seconds == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        Ok(())
    }
}

//! Configuration management for the sift node.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{Result, SiftError};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the index log
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Index log file name inside `data_dir`
    #[serde(default = "default_index_log")]
    pub index_log: String,

    /// fsync the log after every append
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(SiftError::ConfigError(format!(
                "Unknown log format '{other}' (expected pretty or json)"
            ))),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// Default value functions
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_index_log() -> String {
    "indexes.dat".to_string()
}

fn default_sync_writes() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_log: default_index_log(),
            sync_writes: default_sync_writes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl StorageConfig {
    /// Full path of the index log
    pub fn index_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_log)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SiftError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. SIFT_CONFIG env var
    /// 2. XDG config file (~/.config/sift/config.toml, or SIFT_CONFIG_FILE)
    /// 3. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SIFT_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else {
                Self::default()
            }
        };

        // Use the XDG data directory unless one was configured
        if env::var("SIFT_DATA_DIR").is_err() && config.storage.data_dir == default_data_dir() {
            config.storage.data_dir = xdg.data_dir.clone();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Storage configuration
        if let Ok(data_dir) = env::var("SIFT_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(index_log) = env::var("SIFT_INDEX_LOG") {
            self.storage.index_log = index_log;
        }
        if let Ok(sync) = env::var("SIFT_SYNC_WRITES") {
            if let Ok(s) = sync.parse() {
                self.storage.sync_writes = s;
            }
        }

        // Logging configuration
        if let Ok(level) = env::var("SIFT_LOG_LEVEL") {
            self.logging.level = level.to_ascii_lowercase();
        }
        if let Ok(format) = env::var("SIFT_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.index_log.trim().is_empty() {
            return Err(SiftError::ConfigError(
                "Index log file name must be non-empty".to_string(),
            ));
        }

        if self.storage.index_log.contains(['/', '\\']) {
            return Err(SiftError::ConfigError(format!(
                "Index log '{}' must be a file name, not a path",
                self.storage.index_log
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(SiftError::ConfigError(format!(
                "Unknown log level '{}' (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::debug!("Configuration loaded:");
        tracing::debug!("  Data dir: {:?}", self.storage.data_dir);
        tracing::debug!("  Index log: {}", self.storage.index_log);
        tracing::debug!("  Sync writes: {}", self.storage.sync_writes);
        tracing::debug!("  Log level: {}", self.logging.level);
        tracing::debug!("  Log format: {:?}", self.logging.format);
    }
}

//! XDG Base Directory Support
//!
//! Resolves where the node reads its configuration and keeps its
//! index log.

use std::env;
use std::fs;
use std::path::PathBuf;

/// Application directory name under each XDG base
const APP_DIR: &str = "sift";

/// XDG directory structure for sift
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories.
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit SIFT_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share)
    pub fn new() -> Self {
        Self {
            config_dir: resolve("SIFT_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: resolve("SIFT_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
        }
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        if let Ok(file) = env::var("SIFT_CONFIG_FILE") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Create the data directory if it doesn't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data: {:?}", self.data_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(explicit: &str, xdg_var: &str, default_under_home: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(explicit) {
        return PathBuf::from(dir);
    }

    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join(APP_DIR);
    }

    let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for part in default_under_home {
        dir.push(part);
    }
    dir.join(APP_DIR)
}

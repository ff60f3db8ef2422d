//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::{config_path, socket_name};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Backend connection settings
#[derive(Debug, Deserialize, Default)]
pub struct BackendConfig {
    /// Socket path (Unix) or pipe name (Windows) overriding the default
    pub socket: Option<String>,
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Per-call timeout, 0 waits indefinitely
    #[serde(default)]
    pub call_secs: u64,

    /// Timeout for establishing the connection
    #[serde(default = "default_connect")]
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            call_secs: 0,
            connect_secs: default_connect(),
        }
    }
}

fn default_connect() -> u64 {
    5
}

impl Timeouts {
    /// Per-call timeout, `None` when calls may wait indefinitely
    pub fn call(&self) -> Option<Duration> {
        (self.call_secs > 0).then(|| Duration::from_secs(self.call_secs))
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Socket name to connect to
    ///
    /// An explicit override wins over the config file, which wins over the
    /// platform default.
    pub fn socket(&self, override_name: Option<&str>) -> String {
        override_name
            .map(str::to_string)
            .or_else(|| self.backend.socket.clone())
            .unwrap_or_else(socket_name)
    }
}

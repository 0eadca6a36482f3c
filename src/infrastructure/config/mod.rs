//! Configuration loading for the quote server.
//!
//! Supports a JSON configuration file (`--config`) with serde defaults for
//! every field, so a partial file or no file at all both work. `HOST` and
//! `PORT` environment variables override the server section at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub stream: StreamConfig,
}

/// Listener address settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Live-data broadcast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Publish period in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Per-connection outbound queue capacity.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Maximum quotes per broadcast snapshot.
    #[serde(default = "default_snapshot_limit")]
    pub snapshot_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_channel_capacity() -> usize {
    100
}

fn default_snapshot_limit() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            interval_ms: default_interval_ms(),
            channel_capacity: default_channel_capacity(),
            snapshot_limit: default_snapshot_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {error}")]
    Io { path: String, error: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

// ABOUTME: Configuration loading for docchat.
// ABOUTME: Reads ~/.docchat/config.toml, then applies environment and CLI overrides.

use std::path::PathBuf;

use serde::Deserialize;

/// Environment variable overriding `server.base_url`.
pub const SERVER_URL_ENV: &str = "DOCCHAT_SERVER_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

/// Answering service endpoint and HTTP client limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    /// Origin of the web front end, used to build shareable chat links.
    pub share_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout_seconds: 10,
            request_timeout_seconds: 300,
            share_base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Where registry and conversation snapshots live.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from ~/.docchat/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `DOCCHAT_SERVER_URL` if set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                self.server.base_url = url.trim().to_string();
            }
        }
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docchat")
            .join("config.toml")
    }

    /// Directory for local snapshots and the log file.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docchat")
    }

    /// Path of the tracing output file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("docchat.log")
    }
}

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::i18n::Language;
use crate::llm::GeminiConfig;
use crate::llm::gemini::{DEFAULT_API_KEY_ENV, DEFAULT_MODEL, GEMINI_API_URL};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: Option<Language>,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub remote_url: String,
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            data_dir: default_data_dir(),
            remote_url: "http://localhost:3001".to_string(),
            timeout_ms: 30000,
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_ms: 60000,
        }
    }
}

impl LlmConfig {
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            database: default_data_dir().join("tools.db"),
        }
    }
}

impl ServerConfig {
    /// Resolve `host:port` to the first bindable address; `host` may be a name
    pub async fn resolve_addr(&self) -> Result<SocketAddr> {
        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .context(format!("Could not resolve server address {}:{}", self.host, self.port))?;
        addrs
            .next()
            .ok_or_else(|| eyre::eyre!("No address found for {}:{}", self.host, self.port))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(env!("CARGO_PKG_NAME"))
}

/// Implicit config locations, most specific first
fn default_config_paths() -> Vec<PathBuf> {
    let file_name = format!("{}.yml", env!("CARGO_PKG_NAME"));
    let user = dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(&file_name));
    user.into_iter().chain([PathBuf::from(file_name)]).collect()
}

impl Config {
    /// Load the tooltrack config
    ///
    /// An explicit path must load. Otherwise the user config dir, then the
    /// working directory, are tried; unreadable files there are skipped with
    /// a warning and the defaults apply when nothing loads.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in default_config_paths().iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Skipping config {}: {:#}", candidate.display(), e),
            }
        }

        log::info!("No tooltrack config found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&text).context("Failed to parse config file")?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use webnovel_lib::models::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api/v1";
pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("page_size should be between 1 and 100, got {0}")]
    PageSize(u32),
    #[error("scroll_proximity should be positive, got {0}")]
    ScrollProximity(f64),
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryConfig {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0 based), doubling each time
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClientConfig {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_scroll_proximity")]
    pub scroll_proximity: f64,
    /// seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            path: webnovel_home().join("config.yml"),
            base_url: default_base_url(),
            page_size: default_page_size(),
            scroll_proximity: default_scroll_proximity(),
            request_timeout: default_request_timeout(),
            retry: RetryConfig::default(),
            storage_path: default_storage_path(),
        }
    }
}

pub fn webnovel_home() -> PathBuf {
    match std::env::var("WEBNOVEL_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".webnovel-manager"),
    }
}

fn default_base_url() -> String {
    match std::env::var("WEBNOVEL_API_URL") {
        Ok(origin) if !origin.trim().is_empty() => api_url(&origin),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_scroll_proximity() -> f64 {
    1.2
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    1
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

fn default_storage_path() -> PathBuf {
    webnovel_home().join("storage.json")
}

/// Joins a service origin with the API prefix, leaving URLs that already
/// carry it untouched
pub fn api_url(origin: &str) -> String {
    let origin = origin.trim().trim_end_matches('/');
    if origin.ends_with(API_PREFIX) {
        origin.to_string()
    } else {
        format!("{origin}{API_PREFIX}")
    }
}

impl ClientConfig {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<ClientConfig, ConfigError> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => webnovel_home().join("config.yml"),
        };

        let cfg = match std::fs::File::open(&config_path) {
            Ok(file) => {
                info!("Open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                cfg
            }
            Err(_) => {
                let cfg = ClientConfig {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("Write default config at {:?}", cfg.path);
                cfg
            }
        };

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?).map_err(|source| {
            ConfigError::Io {
                path: self.path.clone(),
                source,
            }
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::PageSize(self.page_size));
        }
        if self.scroll_proximity.is_nan() || self.scroll_proximity <= 0.0 {
            return Err(ConfigError::ScrollProximity(self.scroll_proximity));
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Config that never touches disk, for tests and one-off sessions
    pub fn ephemeral(base_url: impl Into<String>) -> Self {
        Self {
            path: PathBuf::new(),
            base_url: base_url.into(),
            page_size: default_page_size(),
            scroll_proximity: default_scroll_proximity(),
            request_timeout: default_request_timeout(),
            retry: RetryConfig::none(),
            storage_path: PathBuf::new(),
        }
    }
}

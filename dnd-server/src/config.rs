//! Server configuration from the environment.

use dnd_engine::RetryConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// File name used inside `DND_DATA_DIR`.
pub const CHARACTERS_FILE: &str = "characters.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    /// Overrides the client's default model when set.
    pub model: Option<String>,
    pub completion_timeout: Duration,
    pub completion_retries: u32,
    /// Characters persist under this directory when set, otherwise in memory.
    pub data_dir: Option<PathBuf>,
    pub cors_origin: String,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = RetryConfig::default();

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse(&get, "PORT")?.unwrap_or(DEFAULT_PORT),
            api_key: get("ANTHROPIC_API_KEY").ok_or(ConfigError::Missing("ANTHROPIC_API_KEY"))?,
            model: get("DND_MODEL"),
            completion_timeout: parse(&get, "DND_COMPLETION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            completion_retries: parse(&get, "DND_COMPLETION_RETRIES")?
                .unwrap_or(defaults.max_retries),
            data_dir: get("DND_DATA_DIR").map(PathBuf::from),
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default()
            .with_timeout(self.completion_timeout)
            .with_max_retries(self.completion_retries)
    }

    pub fn characters_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(CHARACTERS_FILE))
    }
}

fn parse<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}

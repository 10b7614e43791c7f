use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cleanup::DEFAULT_RETENTION_DAYS;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_MB: usize = 50;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub storage_dir: PathBuf,
    pub web_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub retention_days: u64,
    /// Run the retention sweep inside the server on this interval
    pub cleanup_interval: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_var(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let max_upload_mb: usize =
            parse_var(&lookup, "MAX_UPLOAD_MB")?.unwrap_or(DEFAULT_MAX_UPLOAD_MB);
        let retention_days = parse_var(&lookup, "RETENTION_DAYS")?.unwrap_or(DEFAULT_RETENTION_DAYS);
        let cleanup_hours: u64 = parse_var(&lookup, "CLEANUP_INTERVAL_HOURS")?.unwrap_or(0);

        Ok(Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            storage_dir: lookup("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./storage")),
            web_dir: lookup("WEB_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./web")),
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            retention_days,
            cleanup_interval: (cleanup_hours > 0)
                .then(|| Duration::from_secs(cleanup_hours.saturating_mul(3600))),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),
}

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE: &str = "pagedesk.db";
pub const DEFAULT_LOG: &str = "info";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Database value selecting a throwaway in-memory store
pub const IN_MEMORY: &str = ":memory:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub database: DatabaseLocation,
    pub log_filter: String,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Read configuration from `PAGEDESK_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset or blank keys take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("PAGEDESK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "PAGEDESK_BIND",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let database = match get("PAGEDESK_DATABASE") {
            Some(value) if value.trim() == IN_MEMORY => DatabaseLocation::InMemory,
            Some(value) => DatabaseLocation::File(PathBuf::from(value.trim())),
            None => DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE)),
        };

        let log_filter = get("PAGEDESK_LOG").unwrap_or_else(|| DEFAULT_LOG.to_string());

        let max_upload_bytes = match get("PAGEDESK_MAX_UPLOAD_BYTES") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        key: "PAGEDESK_MAX_UPLOAD_BYTES",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "PAGEDESK_MAX_UPLOAD_BYTES",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(AppConfig {
            bind,
            database,
            log_filter,
            max_upload_bytes,
        })
    }
}

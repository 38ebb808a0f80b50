//! Server configuration loaded from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Default port for the HTTP API.
pub const DEFAULT_PORT: u16 = 8001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Settings for `notekeep serve`.
///
/// Environment variables:
/// - `NOTEKEEP_DB_PATH`: database file (default: platform data directory)
/// - `NOTEKEEP_HOST`: bind address (default: `127.0.0.1`)
/// - `NOTEKEEP_PORT`: bind port (default: `8001`)
/// - `NOTEKEEP_CORS_ORIGINS`: comma-separated allowed origins (default: any)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: Option<PathBuf>,
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("NOTEKEEP_DB_PATH").filter(|s| !s.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(host) = lookup("NOTEKEEP_HOST") {
            config.host = host.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "NOTEKEEP_HOST",
                value: host.clone(),
            })?;
        }

        if let Some(port) = lookup("NOTEKEEP_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "NOTEKEEP_PORT",
                value: port.clone(),
            })?;
        }

        config.cors_origins = lookup("NOTEKEEP_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

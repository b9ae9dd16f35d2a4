//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Address to bind when `SUBWAY_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "subway_server=info,tower_http=info";

/// Errors that can occur while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Configuration for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,

    /// Where to persist line data. Nothing is persisted when unset.
    pub snapshot_path: Option<PathBuf>,

    /// `tracing_subscriber` filter directive.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            snapshot_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("SUBWAY_BIND_ADDR") {
            config.bind_addr = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddr { value, source })?;
        }

        if let Some(value) = lookup("SUBWAY_SNAPSHOT_PATH") {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty("SUBWAY_SNAPSHOT_PATH"));
            }
            config.snapshot_path = Some(PathBuf::from(value));
        }

        if let Some(value) = lookup("RUST_LOG")
            && !value.trim().is_empty()
        {
            config.log_filter = value;
        }

        Ok(config)
    }
}

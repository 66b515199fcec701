//! Application settings, read from `APP_*` environment variables with sensible defaults.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory that relative image paths are resolved against.
    pub public_root: PathBuf,
    /// Request channel capacity of every resource actor.
    pub actor_buffer: usize,
    /// Attempts per `store` / `modify` transaction.
    pub transaction_attempts: u32,
    pub http_addr: SocketAddr,
    /// Events a slow chat subscriber may fall behind before it starts skipping.
    pub broadcast_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_root: PathBuf::from("public"),
            actor_buffer: 32,
            transaction_attempts: resource_framework::DEFAULT_TRANSACTION_ATTEMPTS,
            http_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            broadcast_capacity: 64,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(root) = lookup("APP_PUBLIC_ROOT") {
            config.public_root = PathBuf::from(root);
        }
        if let Some(buffer) = parse(&lookup, "APP_ACTOR_BUFFER")? {
            config.actor_buffer = buffer;
        }
        if let Some(attempts) = parse(&lookup, "APP_TRANSACTION_ATTEMPTS")? {
            config.transaction_attempts = attempts;
        }
        if let Some(addr) = parse(&lookup, "APP_HTTP_ADDR")? {
            config.http_addr = addr;
        }
        if let Some(capacity) = parse(&lookup, "APP_BROADCAST_CAPACITY")? {
            config.broadcast_capacity = capacity;
        }

        if config.actor_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: "APP_ACTOR_BUFFER",
                value: "0".into(),
            });
        }
        if config.transaction_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "APP_TRANSACTION_ATTEMPTS",
                value: "0".into(),
            });
        }
        if config.broadcast_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "APP_BROADCAST_CAPACITY",
                value: "0".into(),
            });
        }
        Ok(config)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

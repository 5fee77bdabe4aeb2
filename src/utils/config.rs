use std::env;
use std::net::SocketAddr;

use dotenv::dotenv;
use thiserror::Error;

const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;
const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub secret_key: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    pub bind_addr: SocketAddr,
    pub bcrypt_cost: u32,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing env var {0}")]
    Missing(&'static str),
    #[error("invalid env var {0}")]
    Invalid(&'static str),
}

impl Config {
    /// Production defaults around the given signing secret.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret_key = lookup("ACCESS_KEY").ok_or(ConfigError::Missing("ACCESS_KEY"))?;
        if secret_key.is_empty() {
            return Err(ConfigError::Invalid("ACCESS_KEY"));
        }

        let mut config = Self::new(secret_key);
        config.access_ttl_secs = parse_or(&lookup, "ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        config.refresh_ttl_secs = parse_or(&lookup, "REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?;
        if config.access_ttl_secs <= 0 || config.refresh_ttl_secs <= 0 {
            return Err(ConfigError::Invalid("token TTL must be positive"));
        }

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|_| ConfigError::Invalid("BIND_ADDR"))?;
        }
        config.bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;

        Ok(config)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(v) => v.parse::<T>().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

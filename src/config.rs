//! Process configuration read from the environment (and `.env` via dotenvy).

use std::env;

use thiserror::Error;

pub const DEFAULT_MNEMONIC_BASE_URL: &str = "https://ethereum-rest.api.mnemonichq.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TOP_COLLECTIONS_LIMIT: u32 = 50;
pub const DEFAULT_DAILY_SYNC_INTERVAL_SECS: u64 = 86400;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub mnemonic_api_key: String,
    pub mnemonic_base_url: String,
    pub top_collections_limit: u32,
    pub bind_addr: String,
    pub daily_sync_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let daily_sync_interval_secs = positive(
            "DAILY_SYNC_INTERVAL_SECS",
            parse_or(
                &lookup,
                "DAILY_SYNC_INTERVAL_SECS",
                DEFAULT_DAILY_SYNC_INTERVAL_SECS,
            )?,
        )?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            mnemonic_api_key: required("MNEMONIC_API_KEY")?,
            mnemonic_base_url: lookup("MNEMONIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_MNEMONIC_BASE_URL.to_string()),
            top_collections_limit: parse_or(
                &lookup,
                "TOP_COLLECTIONS_LIMIT",
                DEFAULT_TOP_COLLECTIONS_LIMIT,
            )?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            daily_sync_interval_secs,
        })
    }
}

/// The scheduler tick cannot be zero
fn positive(name: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

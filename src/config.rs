use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::{invalid_input_error, Error};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_address: SocketAddr,
    pub log_filter: String,
}

impl Config {
    /// Reads settings from the environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| invalid_input_error("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            bind_address: parse_or(
                &lookup,
                "BIND_ADDRESS",
                SocketAddr::from_str(DEFAULT_BIND_ADDRESS)
                    .map_err(|_| invalid_input_error("invalid default bind address"))?,
            )?,
            log_filter: lookup("LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| invalid_input_error(format!("{} has an invalid value: {}", key, value))),
    }
}

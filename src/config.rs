//! Startup configuration read from the environment.
//!
//! - `GREETER_MODE`: `lambda` or `http`. Defaults to `lambda` when
//!   `AWS_LAMBDA_RUNTIME_API` is present, `http` otherwise.
//! - `GREETER_ADDR`: listen address in http mode (default `127.0.0.1:8000`).
//! - `GREETER_BASE_PATH`: prefix stripped from Lambda request paths (default `/`).

use std::net::SocketAddr;
use thiserror::Error;

use crate::adapter::normalize_base_path;

pub const MODE_ENV: &str = "GREETER_MODE";
pub const ADDR_ENV: &str = "GREETER_ADDR";
pub const BASE_PATH_ENV: &str = "GREETER_BASE_PATH";
/// Set by the Lambda execution environment.
pub const LAMBDA_RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be `lambda` or `http`, got `{value}`")]
    InvalidMode { var: &'static str, value: String },

    #[error("{var} is not a socket address: `{value}`")]
    InvalidAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{var} must be a path, got `{value}`")]
    InvalidBasePath { var: &'static str, value: String },
}

/// Which transport serves the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeMode {
    Lambda,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: ServeMode,
    pub addr: SocketAddr,
    pub base_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup(MODE_ENV) {
            Some(value) => parse_mode(&value)?,
            None if lookup(LAMBDA_RUNTIME_API_ENV).is_some() => ServeMode::Lambda,
            None => ServeMode::Http,
        };

        let addr = lookup(ADDR_ENV).unwrap_or_else(|| DEFAULT_ADDR.to_owned());
        let addr: SocketAddr = addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                var: ADDR_ENV,
                value: addr.clone(),
                source,
            })?;

        let base_path = match lookup(BASE_PATH_ENV) {
            Some(value) => parse_base_path(&value)?,
            None => "/".to_owned(),
        };

        Ok(Config {
            mode,
            addr,
            base_path,
        })
    }
}

fn parse_mode(value: &str) -> Result<ServeMode, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lambda" => Ok(ServeMode::Lambda),
        "http" => Ok(ServeMode::Http),
        _ => Err(ConfigError::InvalidMode {
            var: MODE_ENV,
            value: value.to_owned(),
        }),
    }
}

fn parse_base_path(value: &str) -> Result<String, ConfigError> {
    let normalized = normalize_base_path(value);
    if normalized.contains(|c: char| c == '?' || c == '#' || c.is_whitespace()) {
        return Err(ConfigError::InvalidBasePath {
            var: BASE_PATH_ENV,
            value: value.to_owned(),
        });
    }
    Ok(normalized)
}

//! Process configuration.
//!
//! Every setting is a command-line flag with an environment fallback
//! (a `.env` file is loaded first by `main`). Read once at startup.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::consts::{
    API_KEY_ENV, DEFAULT_API_BASE, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT,
    DEFAULT_RATE_LIMIT_MAX, DEFAULT_RATE_LIMIT_WINDOW_SECS,
};
use crate::server::limiter::RateLimitConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no Gemini credentials found. Set GEMINI_API_KEY or pass --api-key.")]
    MissingCredential,
    #[error("invalid listen address {0}")]
    InvalidAddress(String),
    #[error("rate limit window must be at least one second")]
    InvalidRateLimitWindow,
}

#[derive(Debug, Parser)]
#[command(name = "somo", version, about = "CBC teaching material, relayed through Gemini.")]
pub struct Args {
    /// Gemini API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Interface to listen on: an IP address or a resolvable host name
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Requests allowed per client IP within one window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = DEFAULT_RATE_LIMIT_MAX)]
    pub rate_limit_max: u32,

    /// Rate-limit window length in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = DEFAULT_RATE_LIMIT_WINDOW_SECS)]
    pub rate_limit_window_secs: u64,

    /// Allowed CORS origin (any origin when unset)
    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub listen: SocketAddr,
    pub rate_limit: RateLimitConfig,
    pub cors_origin: Option<String>,
}

/// A blank key counts as missing.
pub fn resolve_api_key(api_key: Option<String>) -> Result<String, ConfigError> {
    api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(ConfigError::MissingCredential)
}

/// Turn `host` and `port` into a bindable address. IP literals (IPv6 with
/// or without brackets) are used as given; anything else is looked up and
/// the first address wins.
pub async fn resolve_listen(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let host = host.trim();
    let literal = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = literal.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    let invalid = || ConfigError::InvalidAddress(format!("{host}:{port}"));
    if host.is_empty() {
        return Err(invalid());
    }
    tokio::net::lookup_host((host, port))
        .await
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)
}

impl Args {
    pub async fn into_config(self) -> Result<Config, ConfigError> {
        let api_key = resolve_api_key(self.api_key)?;
        let listen = resolve_listen(&self.host, self.port).await?;

        if self.rate_limit_window_secs == 0 {
            return Err(ConfigError::InvalidRateLimitWindow);
        }

        Ok(Config {
            api_key,
            model: self.model,
            api_base: self.api_base,
            listen,
            rate_limit: RateLimitConfig {
                max_requests: self.rate_limit_max,
                window: Duration::from_secs(self.rate_limit_window_secs),
            },
            cors_origin: self.cors_origin.filter(|o| !o.trim().is_empty()),
        })
    }
}

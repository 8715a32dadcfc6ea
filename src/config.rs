//! Startup configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{BotError, Result};

/// Default remote-call timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot credential (`TELEGRAM_TOKEN`).
    pub telegram_token: String,
    /// Base URL of the remote storage service (`SERVER_URL`).
    pub server_url: String,
    /// Timeout applied to every remote call (`REQUEST_TIMEOUT_SECS`,
    /// default 30).
    pub request_timeout: Duration,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `TELEGRAM_TOKEN` and `SERVER_URL` are required; missing either is a
    /// startup error the caller should treat as fatal.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_token = lookup("TELEGRAM_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or(BotError::MissingEnv("TELEGRAM_TOKEN"))?;
        let server_url = lookup("SERVER_URL")
            .filter(|v| !v.is_empty())
            .ok_or(BotError::MissingEnv("SERVER_URL"))?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    BotError::InvalidConfig(format!(
                        "REQUEST_TIMEOUT_SECS must be a number of seconds, got {raw:?}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            telegram_token,
            // Trailing slash would double up when endpoints are appended.
            server_url: server_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }
}

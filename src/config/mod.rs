//! Runtime tuning for the extraction engine.
//!
//! Every knob has a default matching the host site's observed rendering
//! behaviour; `Config::from_env` lets a deployment override them through
//! `LEETMARK_*` environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::retry::RetryPolicy;

/// Environment variable names. Public so tests and tooling can refer to them.
pub const ENV_MAX_ATTEMPTS: &str = "LEETMARK_MAX_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "LEETMARK_RETRY_DELAY_MS";
pub const ENV_PREFETCH_DELAY_MS: &str = "LEETMARK_PREFETCH_DELAY_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "LEETMARK_REQUEST_TIMEOUT_MS";
pub const ENV_POLL_INTERVAL_MS: &str = "LEETMARK_POLL_INTERVAL_MS";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;
const DEFAULT_PREFETCH_DELAY_MS: u64 = 1000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    max_attempts: u32,
    retry_delay: Duration,
    prefetch_delay: Duration,
    request_timeout: Duration,
    poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            prefetch_delay: Duration::from_millis(DEFAULT_PREFETCH_DELAY_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to defaults for any
    /// that are unset. Set-but-invalid values are an error, not a fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_attempts =
            read_positive(ENV_MAX_ATTEMPTS, "max_attempts", u64::from(DEFAULT_MAX_ATTEMPTS))?;
        let max_attempts = u32::try_from(max_attempts).map_err(|_| ConfigError::InvalidValue {
            field: "max_attempts",
            reason: format!("{max_attempts} is out of range"),
        })?;

        Ok(Self {
            max_attempts,
            retry_delay: read_millis(ENV_RETRY_DELAY_MS, "retry_delay", DEFAULT_RETRY_DELAY_MS)?,
            prefetch_delay: read_millis(
                ENV_PREFETCH_DELAY_MS,
                "prefetch_delay",
                DEFAULT_PREFETCH_DELAY_MS,
            )?,
            request_timeout: read_millis(
                ENV_REQUEST_TIMEOUT_MS,
                "request_timeout",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?,
            poll_interval: read_millis(
                ENV_POLL_INTERVAL_MS,
                "poll_interval",
                DEFAULT_POLL_INTERVAL_MS,
            )?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_delay)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
    /// Pause between extraction attempts while the page renders.
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
    /// Wait after navigation before a speculative extraction.
    pub fn prefetch_delay(&self) -> Duration {
        self.prefetch_delay
    }
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

fn read_positive(key: &str, field: &'static str, default: u64) -> Result<u64, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(value) => Ok(value),
        Err(err) => Err(ConfigError::InvalidValue {
            field,
            reason: format!("'{raw}': {err}"),
        }),
    }
}

fn read_millis(key: &str, field: &'static str, default: u64) -> Result<Duration, ConfigError> {
    read_positive(key, field, default).map(Duration::from_millis)
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

//! Configuration module - environment variable parsing

use std::env;

/// Default capacity of the outbound frame queue
pub const DEFAULT_OUTBOX_CAPACITY: usize = 64;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Client configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Outbound frames buffered before senders wait
    pub outbox_capacity: usize,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        };

        let outbox_capacity = match lookup("OUTBOX_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or(ConfigError::Invalid("OUTBOX_CAPACITY"))?,
            None => DEFAULT_OUTBOX_CAPACITY,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
            outbox_capacity,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
        }
    }
}

/// Configuration errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Unknown log format: {0} (expected \"pretty\" or \"json\")")]
    InvalidLogFormat(String),
}

//! Viewer configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use canvas::engine::EngineConfig;
use canvas::render::RenderOptions;

use crate::error::ErrorCode;
use crate::source::HostContainer;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/flowable-ui";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SCROLL_SETTLE_MS: u64 = 200;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "E_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Application root the REST paths hang off, without a trailing slash.
    pub base_url: String,
    pub timeouts: RequestTimeouts,
    pub debugger_enabled: bool,
    pub scroll_settle_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeouts: RequestTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            debugger_enabled: false,
            scroll_settle_ms: DEFAULT_SCROLL_SETTLE_MS,
        }
    }
}

impl ViewerConfig {
    /// Build typed viewer config from environment variables.
    ///
    /// All optional:
    /// - `FLOWVIEW_BASE_URL`: default [`DEFAULT_BASE_URL`]
    /// - `FLOWVIEW_REQUEST_TIMEOUT_SECS`: default 30
    /// - `FLOWVIEW_CONNECT_TIMEOUT_SECS`: default 10
    /// - `FLOWVIEW_DEBUGGER`: `true`/`false`/`1`/`0`, default false
    /// - `FLOWVIEW_SCROLL_SETTLE_MS`: default 200
    ///
    /// # Errors
    ///
    /// Returns an error if `FLOWVIEW_DEBUGGER` is not a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("FLOWVIEW_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let timeouts = RequestTimeouts {
            request_secs: env_parse_u64("FLOWVIEW_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("FLOWVIEW_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let debugger_enabled = match std::env::var("FLOWVIEW_DEBUGGER") {
            Ok(raw) => parse_bool("FLOWVIEW_DEBUGGER", &raw)?,
            Err(_) => false,
        };
        let scroll_settle_ms = env_parse_u64("FLOWVIEW_SCROLL_SETTLE_MS", DEFAULT_SCROLL_SETTLE_MS);

        Ok(Self { base_url, timeouts, debugger_enabled, scroll_settle_ms })
    }

    /// Engine settings for one host container. The debugger is on when either
    /// the container or this config enables it.
    #[must_use]
    pub fn engine_config(&self, container: &HostContainer) -> EngineConfig {
        let debugger_enabled = self.debugger_enabled || container.debugger_enabled;
        EngineConfig {
            render: RenderOptions { debugger_enabled, ..RenderOptions::default() },
            scroll_settle: Duration::from_millis(self.scroll_settle_ms),
            ..EngineConfig::default()
        }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue { var, value: raw.to_owned() }),
    }
}

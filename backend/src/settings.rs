//! Service configuration loaded via OrthoConfig.
//!
//! Values layer defaults, `CALLBACK_*` environment variables, and CLI flags.

use std::net::SocketAddr;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::DEFAULT_DRAW_LIMIT;
use crate::outbound::persistence::{DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOG_FORMAT: &str = "json";
const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Log output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Error returned for an unrecognised `log_format` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log format `{0}`; expected `json` or `pretty`")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(UnknownLogFormat(value.to_owned())),
        }
    }
}

/// Configuration for the callback desk service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CALLBACK")]
pub struct ServiceSettings {
    /// Socket address to listen on.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    #[ortho_config(default = DEFAULT_MAX_SIZE)]
    pub pool_max_size: u32,
    /// Idle connections kept open.
    #[ortho_config(default = DEFAULT_MIN_IDLE)]
    pub pool_min_idle: u32,
    /// Tracking-code draws allowed per item before giving up.
    #[ortho_config(default = DEFAULT_DRAW_LIMIT)]
    pub id_draw_limit: u32,
    /// `json` or `pretty`.
    #[ortho_config(default = String::from(DEFAULT_LOG_FORMAT))]
    pub log_format: String,
}

impl ServiceSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.parse()
    }

    /// Configured database URL, falling back to `DATABASE_URL`. Blank values
    /// count as unset.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| std::env::var(FALLBACK_DATABASE_URL_VAR).ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Parsed log format.
    pub fn log_format(&self) -> Result<LogFormat, UnknownLogFormat> {
        self.log_format.parse()
    }
}

//! Process configuration, read from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::http::HeaderValue;
use thiserror::Error;

use spendbook_observability::LogFormat;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: `{value}`")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, expected: &'static str, value: &str) -> Self {
        Self::Invalid {
            var,
            expected,
            value: value.to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `BIND_ADDR`, default `0.0.0.0`.
    pub bind_addr: IpAddr,
    /// `PORT`, default `3001`.
    pub port: u16,
    /// `FRONTEND_URL`: the single origin allowed by CORS.
    pub frontend_origin: HeaderValue,
    /// `LOG_FORMAT`: `json` (default) or `pretty`.
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            frontend_origin: HeaderValue::from_static(DEFAULT_FRONTEND_URL),
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults, malformed
    /// ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("BIND_ADDR") {
            config.bind_addr = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("BIND_ADDR", "IP address", &raw))?;
        }
        if let Some(raw) = lookup("PORT") {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", "port number", &raw))?;
        }
        if let Some(raw) = lookup("FRONTEND_URL") {
            config.frontend_origin = HeaderValue::from_str(raw.trim())
                .map_err(|_| ConfigError::invalid("FRONTEND_URL", "origin", &raw))?;
        }
        if let Some(raw) = lookup("LOG_FORMAT") {
            config.log_format = raw
                .parse()
                .map_err(|_| ConfigError::invalid("LOG_FORMAT", "log format", &raw))?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

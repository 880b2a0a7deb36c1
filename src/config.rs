use std::{env, net::SocketAddr};

use reqwest::Url;
use thiserror::Error;

use crate::domain::{
    geocoding::DEFAULT_GEOCODING_URL, weather::DEFAULT_WEATHER_URL, UpstreamEndpoints,
};
use crate::errors::ErrorMapping;
use crate::logging::LogFormat;
use crate::mcp::handlers::ServerIdentity;

pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub identity: ServerIdentity,
    pub endpoints: UpstreamEndpoints,
    pub error_mapping: ErrorMapping,
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("{0} must be an absolute http(s) URL")]
    InvalidUrl(&'static str),
    #[error("MCP_ERROR_MAPPING must be one of: coalesced, detailed")]
    InvalidErrorMapping,
    #[error("LOG_FORMAT must be one of: compact, json")]
    InvalidLogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup; unset and blank
    /// values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = get("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let identity = ServerIdentity {
            name: get("MCP_SERVER_NAME").unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
            title: get("MCP_SERVER_TITLE").unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
            version: get("MCP_SERVER_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            protocol_version: get("MCP_PROTOCOL_VERSION")
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
        };

        let endpoints = UpstreamEndpoints {
            geocoding: parse_url(
                "GEOCODING_BASE_URL",
                get("GEOCODING_BASE_URL").as_deref().unwrap_or(DEFAULT_GEOCODING_URL),
            )?,
            weather: parse_url(
                "WEATHER_BASE_URL",
                get("WEATHER_BASE_URL").as_deref().unwrap_or(DEFAULT_WEATHER_URL),
            )?,
        };

        let error_mapping = get("MCP_ERROR_MAPPING")
            .map(|value| {
                value
                    .parse::<ErrorMapping>()
                    .map_err(|_| ConfigError::InvalidErrorMapping)
            })
            .transpose()?
            .unwrap_or_default();
        let log_format = get("LOG_FORMAT")
            .map(|value| {
                value
                    .parse::<LogFormat>()
                    .map_err(|_| ConfigError::InvalidLogFormat)
            })
            .transpose()?
            .unwrap_or_default();

        let config = Self {
            bind_addr,
            bind_port,
            identity,
            endpoints,
            error_mapping,
            log_format,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|_| ConfigError::InvalidUrl(key))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(key));
    }
    Ok(url)
}

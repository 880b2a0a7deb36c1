use std::str::FromStr;

use thiserror::Error;

use crate::mcp::registry::RegistryError;
use crate::mcp::rpc::{ErrorCode, JsonRpcError};
use crate::mcp::server::DispatchTableError;

/// Handler-tier failures. The display text is what reaches the wire as the
/// error `message`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("{message}")]
    InvalidArgument { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("No tools available")]
    NoToolsAvailable,
    #[error("{message}")]
    Upstream { message: String },
    #[error("{message}")]
    MalformedResponse { message: String },
    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::NotFound { .. } => "not_found",
            Self::NoToolsAvailable => "no_tools_available",
            Self::Upstream { .. } => "upstream_failure",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Translation table from handler-tier failures to JSON-RPC error codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMapping {
    /// Every failure becomes `INTERNAL_ERROR`; only the message differs.
    #[default]
    Coalesced,
    /// Invalid arguments and missing entities keep distinguishable codes.
    Detailed,
}

impl ErrorMapping {
    pub fn code_for(self, err: &AppError) -> ErrorCode {
        match (self, err) {
            (Self::Coalesced, _) => ErrorCode::InternalError,
            (Self::Detailed, AppError::InvalidArgument { .. }) => ErrorCode::InvalidParams,
            (Self::Detailed, AppError::NotFound { .. }) => ErrorCode::ResourceNotFound,
            (
                Self::Detailed,
                AppError::NoToolsAvailable
                | AppError::Upstream { .. }
                | AppError::MalformedResponse { .. }
                | AppError::Internal { .. },
            ) => ErrorCode::InternalError,
        }
    }

    pub fn to_json_rpc_error(self, err: &AppError) -> JsonRpcError {
        JsonRpcError::new(self.code_for(err), err.to_string())
    }
}

/// Failures while wiring registries and handlers at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    DispatchTable(#[from] DispatchTableError),
    #[error("failed to build upstream HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error mapping must be one of: coalesced, detailed")]
pub struct UnknownErrorMapping;

impl FromStr for ErrorMapping {
    type Err = UnknownErrorMapping;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "coalesced" => Ok(Self::Coalesced),
            "detailed" => Ok(Self::Detailed),
            _ => Err(UnknownErrorMapping),
        }
    }
}

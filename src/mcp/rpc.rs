//! JSON-RPC 2.0 envelope types
//!
//! Requests, result responses and error responses as they travel on the wire,
//! plus the fixed error-code taxonomy shared by the factory, dispatcher and handlers.

use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

pub use rust_mcp_sdk::schema::RequestId;

use crate::mcp::method::McpMethod;

/// String-keyed JSON object, insertion ordered.
pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JsonRpcVersion {
    #[serde(rename = "2.0")]
    V2,
}

impl FromStr for JsonRpcVersion {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "2.0" => Ok(Self::V2),
            _ => Err(()),
        }
    }
}

/// Accepts only JSON integers (within `i64`) and strings.
pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    match value {
        Value::String(id) => Some(RequestId::String(id.clone())),
        Value::Number(number) => number.as_i64().map(RequestId::Integer),
        _ => None,
    }
}

/// Display form used in audit logs; empty for notifications.
pub fn request_id_label(id: Option<&RequestId>) -> String {
    match id {
        Some(RequestId::Integer(id)) => id.to_string(),
        Some(RequestId::String(id)) => id.clone(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Application-defined: a named tool or upstream entity does not exist.
    ResourceNotFound,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ResourceNotFound => -32002,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonObject>,
}

impl JsonRpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// A validated request. Only the request factory constructs these from wire input.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub method: McpMethod,
    pub params: JsonObject,
}

impl JsonRpcRequest {
    pub fn new(method: McpMethod, id: Option<RequestId>, params: JsonObject) -> Self {
        Self {
            jsonrpc: JsonRpcVersion::V2,
            id,
            method,
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResultResponse {
    pub jsonrpc: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub result: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub error: JsonRpcError,
}

impl JsonRpcErrorResponse {
    /// Error raised before a request could be trusted; the id is always `null`.
    pub fn unidentified(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion::V2,
            id: None,
            error: JsonRpcError::new(code, message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonRpcResponse {
    Result(JsonRpcResultResponse),
    Error(JsonRpcErrorResponse),
}

impl JsonRpcResponse {
    pub fn result(request: &JsonRpcRequest, result: JsonObject) -> Self {
        Self::Result(JsonRpcResultResponse {
            jsonrpc: request.jsonrpc,
            id: request.id.clone(),
            result,
        })
    }

    pub fn error(request: &JsonRpcRequest, error: JsonRpcError) -> Self {
        Self::Error(JsonRpcErrorResponse {
            jsonrpc: request.jsonrpc,
            id: request.id.clone(),
            error,
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[cfg(test)]
impl JsonRpcResponse {
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Result(response) => response.id.as_ref(),
            Self::Error(response) => response.id.as_ref(),
        }
    }

    pub fn as_error(&self) -> Option<&JsonRpcError> {
        match self {
            Self::Error(response) => Some(&response.error),
            Self::Result(_) => None,
        }
    }

    pub fn as_result(&self) -> Option<&JsonObject> {
        match self {
            Self::Result(response) => Some(&response.result),
            Self::Error(_) => None,
        }
    }
}

impl From<JsonRpcErrorResponse> for JsonRpcResponse {
    fn from(response: JsonRpcErrorResponse) -> Self {
        Self::Error(response)
    }
}

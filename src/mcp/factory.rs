//! Raw payload to validated request
//!
//! Validation short-circuits on the first failure. Every rejection carries a
//! `null` id since the id itself has not been validated at that point.
//!
//! Non-object `params` are read as an empty map unless strict params checking is
//! enabled, in which case they are rejected as an invalid request.

use serde_json::Value;

use crate::mcp::method::McpMethod;
use crate::mcp::rpc::{
    value_to_request_id, ErrorCode, JsonObject, JsonRpcErrorResponse, JsonRpcRequest,
    JsonRpcVersion,
};

pub const INVALID_VERSION_MESSAGE: &str = "Invalid JsonRpc version.";
pub const MISSING_METHOD_MESSAGE: &str = "Method name not set.";
pub const UNKNOWN_METHOD_MESSAGE: &str = "Method not found.";
pub const INVALID_ID_MESSAGE: &str = "Id must be integer or string or null.";
pub const INVALID_PARAMS_SHAPE_MESSAGE: &str = "Params must be an object.";

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFactory {
    strict_params: bool,
}

impl RequestFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_params(mut self, strict_params: bool) -> Self {
        self.strict_params = strict_params;
        self
    }

    pub fn create_from_str(&self, payload: &str) -> Result<JsonRpcRequest, JsonRpcErrorResponse> {
        let payload: Value = serde_json::from_str(payload)
            .map_err(|err| reject(ErrorCode::ParseError, err.to_string()))?;

        let jsonrpc = payload
            .get("jsonrpc")
            .and_then(Value::as_str)
            .and_then(|version| version.parse::<JsonRpcVersion>().ok())
            .ok_or_else(|| reject(ErrorCode::InvalidRequest, INVALID_VERSION_MESSAGE))?;

        let method_name = payload
            .get("method")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| reject(ErrorCode::InvalidRequest, MISSING_METHOD_MESSAGE))?;

        let method = method_name
            .parse::<McpMethod>()
            .map_err(|_| reject(ErrorCode::MethodNotFound, UNKNOWN_METHOD_MESSAGE))?;

        let id = match payload.get("id") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                value_to_request_id(value)
                    .ok_or_else(|| reject(ErrorCode::InvalidRequest, INVALID_ID_MESSAGE))?,
            ),
        };

        let params = match payload.get("params") {
            None | Some(Value::Null) => JsonObject::new(),
            Some(Value::Object(params)) => params.clone(),
            Some(_) if self.strict_params => {
                return Err(reject(ErrorCode::InvalidRequest, INVALID_PARAMS_SHAPE_MESSAGE))
            }
            Some(_) => JsonObject::new(),
        };

        Ok(JsonRpcRequest {
            jsonrpc,
            id,
            method,
            params,
        })
    }
}

fn reject(code: ErrorCode, message: impl Into<String>) -> JsonRpcErrorResponse {
    JsonRpcErrorResponse::unidentified(code, message)
}

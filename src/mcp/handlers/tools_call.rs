use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::errors::{AppError, ErrorMapping};
use crate::mcp::handlers::MethodHandler;
use crate::mcp::method::McpMethod;
use crate::mcp::registry::CapabilityRegistry;
use crate::mcp::rpc::{JsonObject, JsonRpcRequest, JsonRpcResponse};

/// Invokes a named tool. Every failure on this path, including those raised by the
/// tool itself, is answered with an error envelope and never propagated.
pub struct ToolsCallHandler {
    tools: Arc<CapabilityRegistry>,
    error_mapping: ErrorMapping,
}

impl ToolsCallHandler {
    pub fn new(tools: Arc<CapabilityRegistry>, error_mapping: ErrorMapping) -> Self {
        Self {
            tools,
            error_mapping,
        }
    }

    async fn call(&self, params: &JsonObject) -> Result<JsonObject, AppError> {
        let name = match params.get("name") {
            Some(Value::String(name)) => name.as_str(),
            Some(_) => return Err(AppError::invalid_argument("Tool name must be a string")),
            None => return Err(AppError::invalid_argument("Tool name not set")),
        };
        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => {
                return Err(AppError::invalid_argument("Tool arguments not set"))
            }
            Some(Value::Object(arguments)) => arguments.clone(),
            Some(_) => {
                return Err(AppError::invalid_argument(
                    "Tool arguments must be an object",
                ))
            }
        };

        let tool = self
            .tools
            .get_capability(name)
            .ok_or_else(|| AppError::not_found(format!("No such tool \"{name}\" exists")))?;

        tool.handle(arguments).await
    }
}

#[async_trait]
impl MethodHandler for ToolsCallHandler {
    fn method(&self) -> McpMethod {
        McpMethod::ToolsCall
    }

    async fn handle(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, AppError> {
        match self.call(&request.params).await {
            Ok(result) => Ok(JsonRpcResponse::result(request, result)),
            Err(err) => {
                let tool = request
                    .params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                warn!(
                    tool = tool,
                    kind = err.kind(),
                    error = %err,
                    "tool call failed"
                );
                Ok(JsonRpcResponse::error(
                    request,
                    self.error_mapping.to_json_rpc_error(&err),
                ))
            }
        }
    }
}

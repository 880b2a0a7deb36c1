use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;
use crate::mcp::handlers::MethodHandler;
use crate::mcp::method::McpMethod;
use crate::mcp::registry::CapabilityRegistry;
use crate::mcp::rpc::{JsonObject, JsonRpcRequest, JsonRpcResponse};

pub struct ToolsListHandler {
    tools: Arc<CapabilityRegistry>,
}

impl ToolsListHandler {
    pub fn new(tools: Arc<CapabilityRegistry>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl MethodHandler for ToolsListHandler {
    fn method(&self) -> McpMethod {
        McpMethod::ToolsList
    }

    async fn handle(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, AppError> {
        if !self.tools.has_capabilities() {
            return Err(AppError::NoToolsAvailable);
        }

        let definitions = self
            .tools
            .definitions()
            .cloned()
            .map(Value::Object)
            .collect();

        let mut result = JsonObject::new();
        result.insert(self.tools.name().to_string(), Value::Array(definitions));
        Ok(JsonRpcResponse::result(request, result))
    }
}

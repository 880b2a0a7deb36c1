use std::sync::Arc;

use async_trait::async_trait;
use rust_mcp_sdk::schema::Implementation;
use serde_json::Value;

use crate::errors::AppError;
use crate::mcp::capability::to_json_object;
use crate::mcp::handlers::MethodHandler;
use crate::mcp::method::McpMethod;
use crate::mcp::registry::CapabilityRegistry;
use crate::mcp::rpc::{JsonObject, JsonRpcRequest, JsonRpcResponse};

/// Process-wide identity reported during negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: String,
    pub title: String,
    pub version: String,
    pub protocol_version: String,
}

pub struct InitializeHandler {
    identity: ServerIdentity,
    registries: Vec<Arc<CapabilityRegistry>>,
}

impl InitializeHandler {
    pub fn new(identity: ServerIdentity, registries: Vec<Arc<CapabilityRegistry>>) -> Self {
        Self {
            identity,
            registries,
        }
    }

    fn capabilities(&self) -> JsonObject {
        self.registries
            .iter()
            .filter(|registry| registry.has_capabilities())
            .map(|registry| {
                (
                    registry.name().to_string(),
                    Value::Object(registry.parameters()),
                )
            })
            .collect()
    }

    fn server_info(&self) -> Implementation {
        Implementation {
            name: self.identity.name.clone(),
            version: self.identity.version.clone(),
            title: Some(self.identity.title.clone()),
            description: None,
            icons: vec![],
            website_url: None,
        }
    }
}

#[async_trait]
impl MethodHandler for InitializeHandler {
    fn method(&self) -> McpMethod {
        McpMethod::Initialize
    }

    async fn handle(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, AppError> {
        let mut result = JsonObject::new();
        result.insert(
            "protocolVersion".to_string(),
            Value::String(self.identity.protocol_version.clone()),
        );
        result.insert(
            "capabilities".to_string(),
            Value::Object(self.capabilities()),
        );
        result.insert(
            "serverInfo".to_string(),
            Value::Object(to_json_object(&self.server_info())?),
        );
        result.insert("instructions".to_string(), Value::String(String::new()));

        Ok(JsonRpcResponse::result(request, result))
    }
}

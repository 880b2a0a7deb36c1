//! The central Model Context Protocol engine
//!
//! Turns one raw payload into exactly one JSON-RPC envelope: the request factory
//! validates it, then a method-keyed dispatch table picks the handler.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tracing::{info, warn};

use crate::errors::ErrorMapping;
use crate::mcp::factory::RequestFactory;
use crate::mcp::handlers::MethodHandler;
use crate::mcp::method::McpMethod;
use crate::mcp::rpc::{
    request_id_label, ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
};

pub const UNSUPPORTED_METHOD_MESSAGE: &str = "Method not found or not supported";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchTableError {
    #[error("more than one handler registered for method \"{0}\"")]
    DuplicateHandler(McpMethod),
}

pub struct McpServer {
    factory: RequestFactory,
    handlers: HashMap<McpMethod, Arc<dyn MethodHandler>>,
    error_mapping: ErrorMapping,
}

impl McpServer {
    pub fn builder() -> McpServerBuilder {
        McpServerBuilder::default()
    }

    pub async fn handle(&self, payload: &str) -> JsonRpcResponse {
        match self.factory.create_from_str(payload) {
            Ok(request) => self.dispatch(&request).await,
            Err(rejection) => {
                warn!(
                    code = rejection.error.code.code(),
                    reason = %rejection.error.message,
                    "mcp request rejected"
                );
                rejection.into()
            }
        }
    }

    pub async fn dispatch(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let handler = self
            .handlers
            .get(&request.method)
            .filter(|handler| handler.supports(request));

        let response = match handler {
            Some(handler) => match handler.handle(request).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(method = %request.method, kind = err.kind(), error = %err, "handler failed");
                    JsonRpcResponse::error(request, self.error_mapping.to_json_rpc_error(&err))
                }
            },
            None => JsonRpcResponse::error(
                request,
                JsonRpcError::new(ErrorCode::MethodNotFound, UNSUPPORTED_METHOD_MESSAGE),
            ),
        };

        let id = request_id_label(request.id.as_ref());
        info!(
            method = %request.method,
            id = %id,
            notification = request.is_notification(),
            outcome = if response.is_error() { "failure" } else { "success" },
            "mcp action audited"
        );

        response
    }

    pub fn supported_methods(&self) -> Vec<McpMethod> {
        McpMethod::ALL
            .into_iter()
            .filter(|method| self.handlers.contains_key(method))
            .collect()
    }
}

#[derive(Default)]
pub struct McpServerBuilder {
    handlers: Vec<Arc<dyn MethodHandler>>,
    error_mapping: ErrorMapping,
    strict_params: bool,
}

impl McpServerBuilder {
    pub fn handler(mut self, handler: Arc<dyn MethodHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn error_mapping(mut self, error_mapping: ErrorMapping) -> Self {
        self.error_mapping = error_mapping;
        self
    }

    /// Rejects non-object `params` at the factory instead of reading them as `{}`.
    pub fn strict_params(mut self, strict_params: bool) -> Self {
        self.strict_params = strict_params;
        self
    }

    /// Fails when two handlers claim the same method.
    pub fn build(self) -> Result<McpServer, DispatchTableError> {
        let mut handlers = HashMap::with_capacity(self.handlers.len());
        for handler in self.handlers {
            let method = handler.method();
            if handlers.insert(method, handler).is_some() {
                return Err(DispatchTableError::DuplicateHandler(method));
            }
        }

        Ok(McpServer {
            factory: RequestFactory::new().with_strict_params(self.strict_params),
            handlers,
            error_mapping: self.error_mapping,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::errors::AppError;
    use crate::mcp::handlers::{
        InitializeHandler, ServerIdentity, ToolsCallHandler, ToolsListHandler,
    };
    use crate::mcp::registry::tests::StubCapability;
    use crate::mcp::registry::{CapabilityGroup, CapabilityRegistry};
    use crate::mcp::rpc::{JsonObject, RequestId};

    struct CountingHandler {
        method: McpMethod,
        accept: bool,
        supports_calls: AtomicUsize,
        handle_calls: AtomicUsize,
    }

    impl CountingHandler {
        fn new(method: McpMethod, accept: bool) -> Arc<Self> {
            Arc::new(Self {
                method,
                accept,
                supports_calls: AtomicUsize::new(0),
                handle_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MethodHandler for CountingHandler {
        fn method(&self) -> McpMethod {
            self.method
        }

        fn supports(&self, request: &JsonRpcRequest) -> bool {
            self.supports_calls.fetch_add(1, Ordering::SeqCst);
            self.accept && request.method == self.method
        }

        async fn handle(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, AppError> {
            self.handle_calls.fetch_add(1, Ordering::SeqCst);
            let mut result = JsonObject::new();
            result.insert("status".to_string(), json!("success"));
            Ok(JsonRpcResponse::result(request, result))
        }
    }

    fn tools_registry(names: &[&str]) -> Arc<CapabilityRegistry> {
        Arc::new(
            CapabilityRegistry::new(
                CapabilityGroup::Tools,
                names.iter().map(|name| StubCapability::ok(name, "ok")).collect(),
            )
            .expect("unique names"),
        )
    }

    fn full_server(tools: Arc<CapabilityRegistry>) -> McpServer {
        let identity = ServerIdentity {
            name: "weather".to_string(),
            title: "Weather".to_string(),
            version: "1.0.0".to_string(),
            protocol_version: "2025-06-18".to_string(),
        };
        McpServer::builder()
            .handler(Arc::new(InitializeHandler::new(identity, vec![tools.clone()])))
            .handler(Arc::new(ToolsListHandler::new(tools.clone())))
            .handler(Arc::new(ToolsCallHandler::new(tools, ErrorMapping::Coalesced)))
            .build()
            .expect("unique handlers")
    }

    #[tokio::test]
    async fn delegates_to_the_handler_owning_the_method() {
        let handler = CountingHandler::new(McpMethod::Initialize, true);
        let server = McpServer::builder()
            .handler(handler.clone())
            .build()
            .expect("unique handlers");

        let response = server
            .handle(r#"{"jsonrpc":"2.0","method":"initialize","id":1}"#)
            .await;

        assert_eq!(handler.handle_calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.as_result().expect("result")["status"], "success");
        assert_eq!(response.id(), Some(&RequestId::Integer(1)));
    }

    #[tokio::test]
    async fn factory_errors_bypass_handlers() {
        let handler = CountingHandler::new(McpMethod::Initialize, true);
        let server = McpServer::builder()
            .handler(handler.clone())
            .build()
            .expect("unique handlers");

        let response = server.handle("{invalid json}").await;

        assert_eq!(
            response.as_error().map(|error| error.code),
            Some(ErrorCode::ParseError)
        );
        assert_eq!(handler.supports_calls.load(Ordering::SeqCst), 0);
        assert_eq!(handler.handle_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn declined_request_is_method_not_found_with_request_id() {
        let handler = CountingHandler::new(McpMethod::Initialize, false);
        let server = McpServer::builder()
            .handler(handler.clone())
            .build()
            .expect("unique handlers");

        let response = server
            .handle(r#"{"jsonrpc":"2.0","method":"initialize","id":"abc"}"#)
            .await;

        let error = response.as_error().expect("error envelope");
        assert_eq!(error.code, ErrorCode::MethodNotFound);
        assert_eq!(error.message, UNSUPPORTED_METHOD_MESSAGE);
        assert_eq!(response.id(), Some(&RequestId::String("abc".to_string())));
        assert_eq!(handler.supports_calls.load(Ordering::SeqCst), 1);
        assert_eq!(handler.handle_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn recognised_method_without_handler_is_method_not_found() {
        let server = full_server(tools_registry(&["echo"]));

        for method in ["prompts/list", "resources/read", "notifications/tools/list_changed"] {
            let payload = format!(r#"{{"jsonrpc":"2.0","method":"{method}","id":4}}"#);
            let response = server.handle(&payload).await;
            let error = response.as_error().expect("error envelope");
            assert_eq!(error.code, ErrorCode::MethodNotFound, "method {method}");
            assert_eq!(error.message, UNSUPPORTED_METHOD_MESSAGE);
            assert_eq!(response.id(), Some(&RequestId::Integer(4)));
        }
    }

    #[test]
    fn duplicate_handlers_are_rejected_at_construction() {
        let result = McpServer::builder()
            .handler(CountingHandler::new(McpMethod::ToolsList, true))
            .handler(CountingHandler::new(McpMethod::ToolsList, true))
            .build();

        assert_eq!(
            result.err(),
            Some(DispatchTableError::DuplicateHandler(McpMethod::ToolsList))
        );
    }

    #[tokio::test]
    async fn initialize_scenario_lists_non_empty_registries() {
        let tools = tools_registry(&["echo"]);
        let prompts = Arc::new(
            CapabilityRegistry::new(
                CapabilityGroup::Prompts,
                vec![StubCapability::ok("greeting", "hi")],
            )
            .expect("unique names"),
        );
        let identity = ServerIdentity {
            name: "weather".to_string(),
            title: "Weather".to_string(),
            version: "1.0.0".to_string(),
            protocol_version: "2025-06-18".to_string(),
        };
        let server = McpServer::builder()
            .handler(Arc::new(InitializeHandler::new(identity, vec![tools, prompts])))
            .build()
            .expect("unique handlers");

        let response = server
            .handle(r#"{"jsonrpc":"2.0","method":"initialize","id":1}"#)
            .await;

        assert_eq!(
            response.as_result().expect("result")["capabilities"],
            json!({"tools": {"listChanged": false}, "prompts": {"listChanged": false}})
        );
    }

    #[tokio::test]
    async fn tools_call_for_unknown_tool_is_internal_error() {
        let server = full_server(tools_registry(&["echo"]));

        let response = server
            .handle(r#"{"jsonrpc":"2.0","method":"tools/call","id":5,"params":{"name":"nonexistent","arguments":{}}}"#)
            .await;

        let error = response.as_error().expect("error envelope");
        assert_eq!(error.code, ErrorCode::InternalError);
        assert!(error.message.contains("nonexistent"));
        assert_eq!(response.id(), Some(&RequestId::Integer(5)));
    }

    #[tokio::test]
    async fn tools_list_against_empty_registry_is_an_error_envelope() {
        let server = full_server(tools_registry(&[]));

        let response = server
            .handle(r#"{"jsonrpc":"2.0","method":"tools/list","id":2}"#)
            .await;

        let error = response.as_error().expect("error envelope");
        assert_eq!(error.code, ErrorCode::InternalError);
        assert_eq!(error.message, "No tools available");
        assert_eq!(response.id(), Some(&RequestId::Integer(2)));
    }

    #[tokio::test]
    async fn tools_list_is_byte_identical_across_calls() {
        let server = full_server(tools_registry(&["echo", "other"]));
        let payload = r#"{"jsonrpc":"2.0","method":"tools/list","id":2}"#;

        let first = serde_json::to_vec(&server.handle(payload).await).expect("serialize");
        let second = serde_json::to_vec(&server.handle(payload).await).expect("serialize");

        assert_eq!(first, second);
        let decoded: Value = serde_json::from_slice(&first).expect("valid json");
        assert_eq!(decoded["result"]["tools"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn notifications_still_get_a_response() {
        let server = full_server(tools_registry(&["echo"]));

        let response = server
            .handle(r#"{"jsonrpc":"2.0","method":"tools/list"}"#)
            .await;

        assert!(!response.is_error());
        assert!(response.id().is_none());
    }

    #[tokio::test]
    async fn tools_call_without_arguments_is_internal_error() {
        let server = full_server(tools_registry(&["echo"]));

        let response = server
            .handle(r#"{"jsonrpc":"2.0","method":"tools/call","id":1,"params":{"name":"echo"}}"#)
            .await;

        let error = response.as_error().expect("error envelope");
        assert_eq!(error.code, ErrorCode::InternalError);
        assert_eq!(error.message, "Tool arguments not set");
        assert_eq!(response.id(), Some(&RequestId::Integer(1)));
    }

    #[tokio::test]
    async fn strict_params_reject_list_params_before_dispatch() {
        let handler = CountingHandler::new(McpMethod::ToolsCall, true);
        let payload = r#"{"jsonrpc":"2.0","method":"tools/call","id":1,"params":["echo"]}"#;

        let lenient = McpServer::builder()
            .handler(handler.clone())
            .build()
            .expect("unique handlers");
        assert!(!lenient.handle(payload).await.is_error());
        assert_eq!(handler.handle_calls.load(Ordering::SeqCst), 1);

        let strict = McpServer::builder()
            .handler(handler.clone())
            .strict_params(true)
            .build()
            .expect("unique handlers");
        let response = strict.handle(payload).await;
        assert_eq!(
            response.as_error().map(|error| error.code),
            Some(ErrorCode::InvalidRequest)
        );
        assert!(response.id().is_none());
        assert_eq!(handler.handle_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reports_supported_methods() {
        let server = full_server(tools_registry(&["echo"]));
        assert_eq!(
            server.supported_methods(),
            [McpMethod::Initialize, McpMethod::ToolsList, McpMethod::ToolsCall]
        );
    }
}

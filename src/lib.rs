use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use config::Config;
use errors::{ErrorMapping, StartupError};
use mcp::capability::Capability;
use mcp::handlers::{InitializeHandler, ServerIdentity, ToolsCallHandler, ToolsListHandler};
use mcp::registry::{CapabilityGroup, CapabilityRegistry};
use mcp::server::McpServer;

#[derive(Clone)]
pub struct AppState {
    pub server: Arc<McpServer>,
    pub identity: Arc<ServerIdentity>,
}

impl AppState {
    pub fn new(server: McpServer, identity: ServerIdentity) -> Self {
        Self {
            server: Arc::new(server),
            identity: Arc::new(identity),
        }
    }

    /// Wires the bundled tools against the configured upstream services.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let tools = domain::build_tools(http, &config.endpoints);
        let server = build_server(config.identity.clone(), config.error_mapping, tools)?;

        Ok(Self::new(server, config.identity.clone()))
    }
}

/// Builds the dispatcher. Prompts and resources have no implementations yet, so
/// their registries stay empty and are not advertised. The detailed error
/// mapping also turns on strict `params` checking.
pub fn build_server(
    identity: ServerIdentity,
    error_mapping: ErrorMapping,
    tools: Vec<Arc<dyn Capability>>,
) -> Result<McpServer, StartupError> {
    let tools = Arc::new(CapabilityRegistry::new(CapabilityGroup::Tools, tools)?);
    let prompts = Arc::new(CapabilityRegistry::empty(CapabilityGroup::Prompts));
    let resources = Arc::new(CapabilityRegistry::empty(CapabilityGroup::Resources));

    let server = McpServer::builder()
        .error_mapping(error_mapping)
        .strict_params(error_mapping == ErrorMapping::Detailed)
        .handler(Arc::new(InitializeHandler::new(
            identity,
            vec![tools.clone(), prompts, resources],
        )))
        .handler(Arc::new(ToolsListHandler::new(tools.clone())))
        .handler(Arc::new(ToolsCallHandler::new(tools, error_mapping)))
        .build()?;

    Ok(server)
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

//! Protocol method handlers
//!
//! Each handler owns exactly one [`McpMethod`] and is a pure function of the
//! request plus the immutable state it was built with.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::mcp::method::McpMethod;
use crate::mcp::rpc::{JsonRpcRequest, JsonRpcResponse};

mod initialize;
mod tools_call;
mod tools_list;

pub use initialize::{InitializeHandler, ServerIdentity};
pub use tools_call::ToolsCallHandler;
pub use tools_list::ToolsListHandler;

#[async_trait]
pub trait MethodHandler: Send + Sync {
    fn method(&self) -> McpMethod;

    fn supports(&self, request: &JsonRpcRequest) -> bool {
        request.method == self.method()
    }

    /// A returned `Err` is turned into an error envelope by the dispatcher.
    async fn handle(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, AppError>;
}

//! Axum HTTP handlers for the web server
//!
//! The MCP endpoint hands the raw body to the protocol core and always answers
//! `200 OK`; protocol failures live only inside the JSON-RPC payload.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::mcp::rpc::{ErrorCode, JsonRpcErrorResponse, JsonRpcResponse};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: String,
    pub version: String,
    pub mcp_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery(State(state): State<AppState>) -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: state.identity.name.clone(),
        version: state.identity.version.clone(),
        mcp_endpoint: "/mcp",
    })
}

pub async fn mcp_endpoint(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<JsonRpcResponse>) {
    let response = match std::str::from_utf8(&body) {
        Ok(payload) => state.server.handle(payload).await,
        Err(err) => JsonRpcErrorResponse::unidentified(
            ErrorCode::ParseError,
            format!("request body is not valid UTF-8: {err}"),
        )
        .into(),
    };

    (StatusCode::OK, Json(response))
}

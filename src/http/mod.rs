//! HTTP transport for the Model Context Protocol core
//!
//! Routes `POST /mcp` into the dispatcher plus the health and discovery endpoints.

pub mod handlers;

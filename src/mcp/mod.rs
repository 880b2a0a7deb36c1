//! Model Context Protocol (MCP) core
//!
//! JSON-RPC envelope validation, method dispatch, capability registries and the
//! handlers that tie them together. Transport-agnostic: input is a raw text payload,
//! output is a single JSON-RPC envelope.

pub mod capability;
pub mod factory;
pub mod handlers;
pub mod method;
pub mod registry;
pub mod rpc;
pub mod server;

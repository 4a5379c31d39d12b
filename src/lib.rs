//! Swagger MCP gateway.
//!
//! Turns an OpenAPI/Swagger document into a registry of MCP tools and serves
//! them over line-delimited JSON-RPC on stdin/stdout.

pub mod config;
pub mod mcp;
pub mod openapi;
pub mod services;

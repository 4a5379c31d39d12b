//! MCP (Model Context Protocol) server implementation.
//!
//! Architecture:
//! - `server.rs` -- JSON-RPC protocol handler (stdin/stdout)
//! - `tools.rs`  -- Tool registry, descriptors and invokers
//! - `handlers/` -- Tool handler implementations (http, builtin)

pub mod handlers;
pub mod server;
pub mod tools;

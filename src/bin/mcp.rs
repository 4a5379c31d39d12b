//! Swagger MCP gateway binary.
//!
//! Spawned by an MCP client as a tool server; speaks JSON-RPC 2.0 on stdio.
//!
//! Usage:
//!   swagger-mcp <SPEC> <BASE_URL> [--timeout-secs N] [--builtins] [--log-dir DIR]
//!
//! Example:
//!   swagger-mcp ./swagger.json http://localhost:3000

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use swagger_mcp_lib::config::GatewayConfig;
use swagger_mcp_lib::mcp::handlers::builtin::register_builtins;
use swagger_mcp_lib::mcp::handlers::http::HttpInvoker;
use swagger_mcp_lib::mcp::server::run_server;
use swagger_mcp_lib::openapi::translate::load_registry;
use swagger_mcp_lib::services::logger;

#[tokio::main]
async fn main() {
    // clap exits with usage on missing SPEC / BASE_URL
    let config = GatewayConfig::parse();

    if let Err(e) = logger::init(config.log_dir.as_deref()) {
        eprintln!("[MCP] {}", e);
    }

    if let Err(e) = run(config).await {
        eprintln!("[MCP] Fatal: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    config.validate()?;

    let http =
        Arc::new(HttpInvoker::new(config.timeout()).context("Failed to create HTTP client")?);
    if config.timeout().is_none() {
        warn!("No outbound timeout set; a slow target API blocks the gateway");
    }

    let mut registry = load_registry(&config.spec, &config.base_url, http).await;
    if config.builtins {
        register_builtins(&mut registry);
    }

    info!(base_url = %config.base_url, tools = registry.len(), "Swagger MCP gateway started");

    run_server(registry).await.context("stdin read failed")?;
    Ok(())
}

//! Startup configuration.
//!
//! Every setting can come from the command line or an environment variable
//! (flags win). The API description source and the target base URL are
//! required; everything else is optional.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid base URL \"{url}\": {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base URL must use http or https, got \"{0}\"")]
    UnsupportedScheme(String),
}

/// Gateway settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "swagger-mcp")]
#[command(version, about = "Expose every operation of an OpenAPI/Swagger document as an MCP tool over stdio")]
pub struct GatewayConfig {
    /// API description: path to a .json/.yml/.yaml file, or an http(s) URL
    #[arg(env = "SWAGGER_MCP_SPEC")]
    pub spec: String,

    /// Base URL of the target API, e.g. http://localhost:3000
    #[arg(env = "SWAGGER_MCP_BASE_URL")]
    pub base_url: String,

    /// Per-request timeout for outbound API calls, in seconds (no timeout when unset)
    #[arg(long, env = "SWAGGER_MCP_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Also register the builtin tools (get_current_time, calculate)
    #[arg(long, env = "SWAGGER_MCP_BUILTINS")]
    pub builtins: bool,

    /// Directory for rolling log files (stderr only when unset)
    #[arg(long, env = "SWAGGER_MCP_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl GatewayConfig {
    /// Outbound request timeout, if configured. Zero means none.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// Reject base URLs that could never be called.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        Ok(())
    }
}

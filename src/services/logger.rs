use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default filter when `RUST_LOG` is unset. HTTP client internals are
/// noisy at `info`.
const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn";

/// Initialize the structured logging system.
///
/// Sets up:
/// - Console output on stderr (stdout is reserved for JSON-RPC).
/// - Optional file output: daily rolling `swagger-mcp.<date>.log` files in
///   `log_dir`, keeping the latest 5.
/// - Environment filter: `RUST_LOG`, defaulting to `info`.
///
/// Returns an error if a subscriber is already installed or the log
/// directory cannot be used.
pub fn init(log_dir: Option<&Path>) -> Result<(), String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .compact();

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create log dir {}: {}", dir.display(), e))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("swagger-mcp")
                .filename_suffix("log")
                .max_log_files(5)
                .build(dir)
                .map_err(|e| format!("Failed to create log file appender: {}", e))?;
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| format!("Logger already initialized: {}", e))?;

    if let Some(dir) = log_dir {
        tracing::info!(log_dir = %dir.display(), "Logger initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_with_log_dir_then_reinit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        init(Some(log_dir.as_path())).unwrap();
        assert!(log_dir.is_dir());
        // a global subscriber is now set
        assert!(init(None).is_err());
    }
}

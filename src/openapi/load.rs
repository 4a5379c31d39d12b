//! Loading the API description.
//!
//! Sources, picked by shape of the argument:
//! - `http://...` / `https://...` -- fetched with the shared HTTP client
//! - `*.json`                      -- read and parsed as JSON
//! - `*.yml` / `*.yaml`            -- read and parsed as YAML
//!
//! Everything ends up as a `serde_json::Value` so the translator only deals
//! with one document model.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch API description: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API description fetch returned HTTP {0}")]
    Status(u16),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported API description source: {0} (expected .json, .yml, .yaml or an http(s) URL)")]
    UnsupportedSource(String),
}

/// Document formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_for(name: &str) -> Option<Format> {
    if name.ends_with(".json") {
        Some(Format::Json)
    } else if name.ends_with(".yml") || name.ends_with(".yaml") {
        Some(Format::Yaml)
    } else {
        None
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Parse description text in the given format.
fn parse(text: &str, format: Format) -> Result<Value, LoadError> {
    match format {
        Format::Json => Ok(serde_json::from_str(text)?),
        Format::Yaml => {
            // Go through serde_yaml::Value so non-string keys (e.g. `200:`
            // under `responses`) are stringified instead of rejected.
            let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
            Ok(serde_json::to_value(yaml)?)
        }
    }
}

/// Read a description from a local `.json` / `.yml` / `.yaml` file.
pub async fn load_file(path: &Path) -> Result<Value, LoadError> {
    let display = path.display().to_string();
    let format = format_for(&display).ok_or_else(|| LoadError::UnsupportedSource(display.clone()))?;
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: display,
            source,
        })?;
    parse(&text, format)
}

/// Fetch a description over HTTP(S). YAML is used when the URL path ends in
/// `.yml`/`.yaml`; everything else is parsed as JSON.
pub async fn load_url(client: &reqwest::Client, url: &str) -> Result<Value, LoadError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }
    let text = response.text().await?;
    let path = url.split(['?', '#']).next().unwrap_or(url);
    parse(&text, format_for(path).unwrap_or(Format::Json))
}

/// Load an API description from a file path or URL.
pub async fn load_description(client: &reqwest::Client, source: &str) -> Result<Value, LoadError> {
    let doc = if is_remote(source) {
        load_url(client, source).await?
    } else {
        load_file(Path::new(source)).await?
    };
    info!(source, "Loaded API description");
    Ok(doc)
}

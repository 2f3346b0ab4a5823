//! Catalog loading
//!
//! The chart only needs the parsed `{ "dances": [...] }` document; these
//! helpers fetch it from a local file or over HTTP(S).

use crate::error::{ChartError, Result};
use crate::model::DanceCatalog;
use dtc_common::config::DataSource;
use std::path::Path;
use tracing::{debug, info};

/// Parse a catalog document
pub fn parse_catalog(json: &str) -> Result<DanceCatalog> {
    let catalog: DanceCatalog = serde_json::from_str(json)?;
    debug!(records = catalog.dances.len(), "Parsed dance catalog");
    Ok(catalog)
}

/// Read a catalog from disk
pub async fn load_catalog_file(path: &Path) -> Result<DanceCatalog> {
    let content = tokio::fs::read_to_string(path).await?;
    let catalog = parse_catalog(&content)?;
    info!(
        "Loaded {} dance records from {}",
        catalog.dances.len(),
        path.display()
    );
    Ok(catalog)
}

/// Fetch a catalog over HTTP(S) with a default client
pub async fn fetch_catalog(url: &str) -> Result<DanceCatalog> {
    fetch_catalog_with(&reqwest::Client::new(), url).await
}

/// Fetch a catalog over HTTP(S) with a caller-supplied client
pub async fn fetch_catalog_with(client: &reqwest::Client, url: &str) -> Result<DanceCatalog> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ChartError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    let catalog = parse_catalog(&body)?;
    info!("Fetched {} dance records from {}", catalog.dances.len(), url);
    Ok(catalog)
}

/// Load from whichever source is configured
pub async fn load_catalog(source: &DataSource) -> Result<DanceCatalog> {
    match source {
        DataSource::Path(path) => load_catalog_file(path).await,
        DataSource::Url(url) => fetch_catalog(url).await,
    }
}

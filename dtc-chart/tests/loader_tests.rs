//! Catalog loading tests
//!
//! Covers on-disk catalogs (tempfile) and HTTP fetches against a one-shot
//! local server, plus the controller's async load entry point.

use dtc_chart::loader::{fetch_catalog_with, load_catalog, load_catalog_file};
use dtc_chart::{ChartController, ChartError};
use dtc_common::config::{DataSource, TapConfig};
use std::fs;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const CATALOG: &str = r#"{
    "dances": [
        {"name": "Salsa", "style": "Latin", "timing": "4/4", "min": 150, "max": 250,
         "source": "https://example.com/salsa"},
        {"name": "Bachata", "style": "Latin", "min": 108, "max": 152},
        {"name": "Lindy Hop", "style": "Swing", "min": 120, "max": 180},
        {"name": "Mystery", "style": "Swing"}
    ]
}"#;

/// Serve exactly one HTTP response on an ephemeral port
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{}/data.json", addr)
}

fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_load_catalog_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, CATALOG).unwrap();

    let catalog = load_catalog_file(&path).await.unwrap();
    assert_eq!(catalog.dances.len(), 4);
    assert_eq!(catalog.dances[0].timing.as_deref(), Some("4/4"));

    let same = load_catalog(&DataSource::Path(path)).await.unwrap();
    assert_eq!(same, catalog);
}

#[tokio::test]
async fn test_controller_load_from_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, CATALOG).unwrap();

    let mut controller = ChartController::new(&TapConfig::default());
    let view = controller.load_from(&DataSource::Path(path)).await.unwrap();

    // Mystery has no BPM range and is dropped
    assert_eq!(view.bars.len(), 3);
    assert_eq!(view.toggles.len(), 2);
    assert_eq!(
        controller.model().dance_names,
        vec!["Bachata", "Lindy Hop", "Salsa"]
    );
}

#[tokio::test]
async fn test_failed_load_keeps_previous_chart() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.json");
    let bad = temp_dir.path().join("bad.json");
    fs::write(&good, CATALOG).unwrap();
    fs::write(&bad, "{\"dances\": [").unwrap();

    let mut controller = ChartController::new(&TapConfig::default());
    controller.load_from(&DataSource::Path(good)).await.unwrap();

    let result = controller.load_from(&DataSource::Path(bad)).await;
    assert!(matches!(result, Err(ChartError::Parse(_))));
    assert_eq!(controller.view().bars.len(), 3);
}

#[tokio::test]
async fn test_fetch_catalog_over_http() {
    let url = serve_once("HTTP/1.1 200 OK", CATALOG).await;

    let catalog = fetch_catalog_with(&local_client(), &url).await.unwrap();
    assert_eq!(catalog.dances.len(), 4);
    assert_eq!(
        catalog.dances[0].source.as_deref(),
        Some("https://example.com/salsa")
    );
}

#[tokio::test]
async fn test_fetch_reports_http_status() {
    let url = serve_once("HTTP/1.1 404 Not Found", "{}").await;

    match fetch_catalog_with(&local_client(), &url).await {
        Err(ChartError::Status { status, url: failed }) => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

//! Demo CLI: runs full fraud detection over a plain-text resume and
//! prints the report as JSON. PDF/DOCX inputs need an external
//! extraction step and are rejected here.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fraudcheck::{DetectorConfig, DocumentKind, DocumentMetadata, FraudDetector};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DetectorConfig::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: scan <resume.txt>")?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let kind = DocumentKind::from_extension(extension)?;
    if !kind.is_plain_text() {
        bail!("only .txt input is supported here; extract {extension} documents upstream");
    }

    let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let text = decode_text(&bytes);

    let metadata = DocumentMetadata {
        title: path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string),
        ..DocumentMetadata::bare(kind)
    };

    if config.abstract_api_key.is_none() {
        info!("no verification API key configured; running with local validators only");
    }

    let detector = FraudDetector::new(config);
    let report = detector.detect(&text, Some(&metadata), None).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// UTF-8 with a Latin-1 fallback, matching what upstream extraction does
/// for plain-text uploads.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

//! Text acquisition: web pages, PDF uploads and plain text files.

pub mod fetch;
pub mod html;
pub mod pdf;

use reqwest::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::FetchConfig;

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file is not a PDF document")]
    NotPdf,
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Where the document comes from.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "location", rename_all = "snake_case")]
pub enum DocumentSource {
    Url(String),
    Pdf(PathBuf),
    Text(PathBuf),
    /// Nothing was provided.
    Empty,
}

impl DocumentSource {
    pub fn label(&self) -> String {
        match self {
            DocumentSource::Url(url) => url.clone(),
            DocumentSource::Pdf(path) | DocumentSource::Text(path) => path.display().to_string(),
            DocumentSource::Empty => "(none)".to_string(),
        }
    }
}

/// Produces the raw document text for `source`. Whitespace is left as-is.
pub async fn acquire(
    client: &Client,
    source: &DocumentSource,
    fetch: &FetchConfig,
) -> Result<String, AcquireError> {
    match source {
        DocumentSource::Url(raw) => {
            let url = fetch::parse_page_url(raw)?;
            let body = fetch::fetch_page(client, &url, &fetch.user_agent, fetch.timeout()).await?;
            Ok(html::html_to_text(&body))
        }
        DocumentSource::Pdf(path) => {
            let bytes = read_file(path).await?;
            log::info!("[Source] Extracting text from PDF {:?} ({} bytes)", path, bytes.len());
            pdf::extract_pdf_text(&bytes)
        }
        DocumentSource::Text(path) => {
            let bytes = read_file(path).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        DocumentSource::Empty => Ok(String::new()),
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, AcquireError> {
    tokio::fs::read(path).await.map_err(|source| AcquireError::Io {
        path: path.to_path_buf(),
        source,
    })
}

use reqwest::{header, Client};
use std::time::Duration;
use url::Url;

use super::AcquireError;

/// Only plain web pages are fetched.
pub fn parse_page_url(raw: &str) -> Result<Url, AcquireError> {
    let url = Url::parse(raw.trim()).map_err(|e| AcquireError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AcquireError::InvalidUrl(format!(
            "unsupported scheme '{}' in {}",
            other, raw
        ))),
    }
}

/// Downloads the page body.
///
/// A non-success status is logged but the body is still returned: error pages
/// are summarized like any other page.
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    user_agent: &str,
    timeout: Duration,
) -> Result<String, AcquireError> {
    log::info!("[Fetch] GET {} (timeout {:?})", url, timeout);

    let res = client
        .get(url.clone())
        .header(header::USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| AcquireError::Network(format!("{}: {}", url, e)))?;

    let status = res.status();
    if !status.is_success() {
        log::warn!("[Fetch] {} answered with status {}", url, status);
    }

    let body = res
        .text()
        .await
        .map_err(|e| AcquireError::Network(format!("failed to read body of {}: {}", url, e)))?;

    log::debug!("[Fetch] Received {} bytes", body.len());
    Ok(body)
}

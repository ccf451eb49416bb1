// src/core/scanner/http.rs

use crate::config::ScanConfig;
use crate::error::Result;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, error, warn};

/// Builds the single HTTP client every probe of a run shares.
pub fn build_client(config: &ScanConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;
    Ok(client)
}

/// Sends a probe. Network errors are logged and turned into `None` so the
/// caller can record an "unreachable" outcome and move on.
pub async fn send(request: RequestBuilder, url: &str) -> Option<Response> {
    match request.send().await {
        Ok(response) => {
            debug!(url, status = %response.status(), "Probe answered.");
            Some(response)
        }
        Err(e) => {
            error!(url, error = %e, "Probe failed.");
            None
        }
    }
}

/// Plain GET probe.
pub async fn fetch(client: &Client, url: &str) -> Option<Response> {
    send(client.get(url), url).await
}

/// Reads a response body as text. A body that cannot be read counts as empty.
pub async fn read_body(response: Response, url: &str) -> String {
    match response.text().await {
        Ok(text) => {
            debug!(url, bytes = text.len(), "Read response body.");
            text
        }
        Err(e) => {
            warn!(url, error = %e, "Failed to read response body.");
            String::new()
        }
    }
}

/// A fully read homepage response, kept for the checks that inspect it.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl PageSnapshot {
    pub async fn capture(response: Response, url: &str) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = read_body(response, url).await;
        Self { url: url.to_string(), status, headers, body }
    }
}

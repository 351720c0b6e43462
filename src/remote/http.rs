use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("publication-catalog/", env!("CARGO_PKG_VERSION"));

/// Longest response body excerpt quoted in an HTTP error
const ERROR_BODY_EXCERPT: usize = 200;

/// Create an HTTP client for the literature APIs
pub fn create_api_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// GET a JSON document; non-success statuses are errors quoting the start of the body
pub async fn fetch_json(client: &Client, url: &str, params: &[(&str, String)]) -> Result<Value> {
    debug!("GET {} {:?}", url, params);

    let resp = client
        .get(url)
        .query(params)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?;

    if !status.is_success() {
        let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
        if excerpt.trim().is_empty() {
            bail!("HTTP {} from {}", status, url);
        }
        bail!("HTTP {} from {}: {}", status, url, excerpt.trim());
    }

    serde_json::from_str(&body).with_context(|| format!("Invalid JSON from {}", url))
}

/// Join an API base URL and a path without doubling slashes
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

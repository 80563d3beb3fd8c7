use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::warn;

use crate::errors::FetchError;

pub fn create_client(user_agent: &str, timeout: Duration) -> reqwest::Result<Client> {
    ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Single GET attempt; any non-2xx status is an error.
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> Result<String, FetchError> {
    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            FetchError::Request(e)
        }
    };

    let response = client.get(url).send().await.map_err(classify)?;

    let response = response.error_for_status().map_err(|e| {
        warn!("HTTP error {}: {}", e.status().map(|s| s.as_u16()).unwrap_or_default(), url);
        FetchError::Status(e)
    })?;

    response.text().await.map_err(classify)
}

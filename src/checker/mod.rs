use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};

use crate::config::SiteSpec;
use crate::models::CheckOutcome;
use crate::parsers::extract_target_text;
use crate::utils::http::fetch_page;

/// Fetches one site and compares its target text against the baseline.
pub async fn check_site(client: &Client, site: &SiteSpec, timeout: Duration) -> CheckOutcome {
    info!("Checking website: {} ({})", site.name, site.url);

    match fetch_page(client, &site.url, timeout).await {
        Ok(html) => evaluate(&html, site),
        Err(e) => {
            error!("Error fetching {}: {}", site.url, e);
            CheckOutcome::FetchError(e.to_string())
        }
    }
}

/// Outcome for an already fetched page.
pub fn evaluate(html: &str, site: &SiteSpec) -> CheckOutcome {
    let Some(text) = extract_target_text(html, &site.selector) else {
        error!("Could not find the target element in {}", site.url);
        return CheckOutcome::ElementNotFound;
    };

    info!("Extracted text for {}: {}", site.name, text);

    if text == site.expected_text {
        info!("No change detected for {}", site.name);
        CheckOutcome::Unchanged
    } else {
        CheckOutcome::Changed(text)
    }
}

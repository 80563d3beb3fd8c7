//! Prints the text the watcher would compare for a page, to help write `expected_text`.
//!
//! Usage: inspect_selector <url> <tag> [class tokens]

use anyhow::{bail, Result};
use scraper::Html;
use std::time::Duration;

use puppy_monitor::config::TargetSelector;
use puppy_monitor::parsers::{find_target, visible_text};
use puppy_monitor::utils::http::{create_client, fetch_page};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (url, tag, class) = match args.as_slice() {
        [url, tag] => (url, tag.as_str(), ""),
        [url, tag, class] => (url, tag.as_str(), class.as_str()),
        _ => bail!("usage: inspect_selector <url> <tag> [class tokens]"),
    };

    let timeout = Duration::from_secs(10);
    let client = create_client("Mozilla/5.0 (compatible; puppy-monitor inspect)", timeout)?;

    println!("Fetching {}...", url);
    let html = fetch_page(&client, url, timeout).await?;
    let document = Html::parse_document(&html);
    let selector = TargetSelector::new(tag, class);

    match find_target(&document, &selector) {
        Some(element) => {
            println!("Matched <{}> with classes {:?}", element.value().name(), element.value().classes().collect::<Vec<_>>());
            println!("Normalized text:\n{}", visible_text(element));
        }
        None => println!("No <{}> element carries all of the classes {:?}", tag, class),
    }

    Ok(())
}

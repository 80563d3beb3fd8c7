use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use puppy_monitor::config::Config;
use puppy_monitor::notifier::Notifier;
use puppy_monitor::runner::Watcher;
use puppy_monitor::utils::http::create_client;
use puppy_monitor::{logging, probe, scheduler};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init(false)?;
            error!("{:#}", e);
            return Err(e);
        }
    };

    // Initialize logging
    logging::init(config.log_json)?;

    info!("Starting Puppy Monitor with {} site(s)", config.sites.len());

    let client = create_client(&config.user_agent, config.fetch_timeout())
        .context("Failed to build HTTP client")?;
    let notifier = Notifier::from_env(config.transport, &client, config.fetch_timeout());
    let watcher = Arc::new(Watcher::new(
        client,
        config.sites.clone(),
        config.fetch_timeout(),
        notifier,
    ));

    if config.probe_enabled {
        let listener = probe::bind(config.probe_addr).await?;
        tokio::spawn(async move {
            if let Err(e) = probe::serve(listener).await {
                error!("{:#}", e);
            }
        });
    }

    let mut jobs = scheduler::start(Arc::clone(&watcher), &config.schedule).await?;

    if config.run_on_startup {
        watcher.run().await;
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");

    if let Err(e) = jobs.shutdown().await {
        error!("Scheduler did not shut down cleanly: {}", e);
    }

    Ok(())
}

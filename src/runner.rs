use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::checker::check_site;
use crate::config::SiteSpec;
use crate::models::{RunReport, NOTIFICATION_SUBJECT};
use crate::notifier::{Notifier, NotifyStatus};

/// Everything one run needs; built once at start-up and shared by every trigger.
pub struct Watcher {
    client: Client,
    sites: Vec<SiteSpec>,
    fetch_timeout: Duration,
    notifier: Notifier,
}

#[derive(Debug)]
pub struct RunSummary {
    pub report: RunReport,
    /// `None` when there was nothing to report.
    pub notification: Option<NotifyStatus>,
}

impl Watcher {
    pub fn new(client: Client, sites: Vec<SiteSpec>, fetch_timeout: Duration, notifier: Notifier) -> Self {
        Self {
            client,
            sites,
            fetch_timeout,
            notifier,
        }
    }

    pub fn sites(&self) -> &[SiteSpec] {
        &self.sites
    }

    /// Checks every site in order and sends at most one notification.
    pub async fn run(&self) -> RunSummary {
        info!("Site check started at {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));

        let mut report = RunReport::new();
        for site in &self.sites {
            let outcome = check_site(&self.client, site, self.fetch_timeout).await;
            report.record(site, &outcome);
        }

        if report.is_empty() {
            info!("No changes detected across all websites.");
            return RunSummary {
                report,
                notification: None,
            };
        }

        info!("{} of {} sites need attention, sending notification", report.len(), self.sites.len());
        let status = self.notifier.notify(NOTIFICATION_SUBJECT, &report.body()).await;
        if !status.is_sent() {
            warn!("Changes were detected but no email was sent");
        }

        RunSummary {
            report,
            notification: Some(status),
        }
    }
}

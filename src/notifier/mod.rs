pub mod body;
mod sendgrid;
mod smtp;

pub use sendgrid::{SendGridSettings, SendGridTransport, DEFAULT_SENDGRID_API_URL};
pub use smtp::{SmtpSettings, SmtpTransport, DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::TransportKind;
use crate::errors::{MailConfigError, TransportError};

/// Delivers one message. Implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, subject: &str, body: &str) -> Result<(), TransportError>;
}

/// What happened to a notification; never an error the caller has to handle.
#[derive(Debug)]
pub enum NotifyStatus {
    Sent,
    NotConfigured(String),
    Failed(TransportError),
}

impl NotifyStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, NotifyStatus::Sent)
    }
}

pub struct Notifier {
    transport: Result<Box<dyn Transport>, MailConfigError>,
}

impl Notifier {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport: Ok(transport),
        }
    }

    /// Reads transport settings from the process environment once.
    pub fn from_env(kind: TransportKind, client: &Client, timeout: Duration) -> Self {
        Self::from_lookup(kind, client, timeout, &|var: &str| std::env::var(var).ok())
    }

    pub fn from_lookup(
        kind: TransportKind,
        client: &Client,
        timeout: Duration,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Self {
        let transport = match kind {
            TransportKind::SendGrid => SendGridSettings::from_lookup(lookup)
                .and_then(|settings| SendGridTransport::new(client.clone(), settings))
                .map(|t| Box::new(t) as Box<dyn Transport>),
            TransportKind::Smtp => SmtpSettings::from_lookup(lookup)
                .and_then(|settings| SmtpTransport::new(settings, timeout))
                .map(|t| Box::new(t) as Box<dyn Transport>),
        };

        match &transport {
            Ok(t) => info!("Notifications will be sent via {}", t.name()),
            Err(e) => warn!("Notifications are disabled: {}", e),
        }

        Self { transport }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_ok()
    }

    pub async fn notify(&self, subject: &str, body: &str) -> NotifyStatus {
        let transport = match &self.transport {
            Ok(transport) => transport,
            Err(e) => {
                error!("{}. Check your environment variables.", e);
                return NotifyStatus::NotConfigured(e.to_string());
            }
        };

        match transport.send(subject, body).await {
            Ok(()) => NotifyStatus::Sent,
            Err(e) => {
                error!("Error sending email via {}: {}", transport.name(), e);
                NotifyStatus::Failed(e)
            }
        }
    }
}

/// Collects environment values, remembering every required one that is absent.
/// Blank values count as absent.
pub(crate) struct EnvReader<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
    missing: Vec<&'static str>,
}

impl<'a> EnvReader<'a> {
    pub(crate) fn new(lookup: &'a dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    pub(crate) fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).filter(|value| !value.trim().is_empty())
    }

    pub(crate) fn required(&mut self, var: &'static str) -> String {
        self.optional(var).unwrap_or_else(|| {
            self.missing.push(var);
            String::new()
        })
    }

    pub(crate) fn finish(self, transport: &'static str) -> Result<(), MailConfigError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(MailConfigError::Missing {
                transport,
                missing: self.missing,
            })
        }
    }
}

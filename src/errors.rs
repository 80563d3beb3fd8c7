use std::time::Duration;
use thiserror::Error;

/// Why a monitored page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {}s", .timeout.as_secs_f32())]
    Timeout { url: String, timeout: Duration },

    #[error("{0}")]
    Status(reqwest::Error),

    #[error("{0}")]
    Request(reqwest::Error),
}

/// Notification settings that are absent or unusable.
#[derive(Debug, Error)]
pub enum MailConfigError {
    #[error("{transport} email configuration is missing: {}", .missing.join(", "))]
    Missing {
        transport: &'static str,
        missing: Vec<&'static str>,
    },

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("could not build message: {0}")]
    Message(String),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

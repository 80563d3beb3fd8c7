use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::info;

use super::body::render_html;
use super::{EnvReader, Transport};
use crate::errors::{MailConfigError, TransportError};

pub const DEFAULT_SMTP_SERVER: &str = "smtp-relay.brevo.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub receiver: String,
}

impl SmtpSettings {
    /// Server and port have defaults; credentials never do.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, MailConfigError> {
        let mut env = EnvReader::new(lookup);

        let server = env
            .optional("SMTP_SERVER")
            .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string());
        let port = match env.optional("SMTP_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| MailConfigError::Invalid {
                var: "SMTP_PORT",
                reason: format!("{:?} is not a port number", raw),
            })?,
            None => DEFAULT_SMTP_PORT,
        };
        let username = env.required("SMTP_USERNAME");
        let password = env.required("SMTP_PASSWORD");
        let sender = env.optional("SENDER_EMAIL").unwrap_or_else(|| username.clone());
        let receiver = env.required("RECEIVER_EMAIL");

        env.finish("SMTP")?;

        Ok(Self {
            server,
            port,
            username,
            password,
            sender,
            receiver,
        })
    }
}

/// STARTTLS relay; every send opens its own connection.
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    receiver: Mailbox,
}

impl SmtpTransport {
    pub fn new(settings: SmtpSettings, timeout: Duration) -> Result<Self, MailConfigError> {
        let sender = parse_mailbox("SENDER_EMAIL", &settings.sender)?;
        let receiver = parse_mailbox("RECEIVER_EMAIL", &settings.receiver)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
            .map_err(|e| MailConfigError::Invalid {
                var: "SMTP_SERVER",
                reason: e.to_string(),
            })?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            transport,
            sender,
            receiver,
        })
    }
}

fn parse_mailbox(var: &'static str, address: &str) -> Result<Mailbox, MailConfigError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

#[async_trait]
impl Transport for SmtpTransport {
    fn name(&self) -> &'static str {
        "SMTP"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), TransportError> {
        let email = Message::builder()
            .from(self.sender.clone())
            .to(self.receiver.clone())
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                body.to_string(),
                render_html(body),
            ))
            .map_err(|e| TransportError::Message(e.to_string()))?;

        let response = self.transport.send(email).await?;
        info!("Email sent successfully. SMTP response: {}", response.code());
        Ok(())
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;
use url::Url;

use super::body::render_html;
use super::{EnvReader, Transport};
use crate::errors::{MailConfigError, TransportError};

pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Clone)]
pub struct SendGridSettings {
    pub api_key: String,
    pub sender: String,
    pub receiver: String,
    pub api_url: String,
}

impl SendGridSettings {
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, MailConfigError> {
        let mut env = EnvReader::new(lookup);

        let api_key = env.required("SENDGRID_API_KEY");
        let sender = env.required("SENDER_EMAIL");
        let receiver = env.required("RECEIVER_EMAIL");
        let api_url = env
            .optional("SENDGRID_API_URL")
            .unwrap_or_else(|| DEFAULT_SENDGRID_API_URL.to_string());

        env.finish("SendGrid")?;

        Ok(Self {
            api_key,
            sender,
            receiver,
            api_url,
        })
    }
}

pub struct SendGridTransport {
    client: Client,
    settings: SendGridSettings,
}

impl SendGridTransport {
    pub fn new(client: Client, settings: SendGridSettings) -> Result<Self, MailConfigError> {
        Url::parse(&settings.api_url).map_err(|e| MailConfigError::Invalid {
            var: "SENDGRID_API_URL",
            reason: e.to_string(),
        })?;

        Ok(Self { client, settings })
    }
}

#[derive(Serialize)]
struct SendGridEmail<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: EmailAddress<'a>,
    subject: &'a str,
    content: Vec<Content>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<EmailAddress<'a>>,
}

#[derive(Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: String,
}

#[async_trait]
impl Transport for SendGridTransport {
    fn name(&self) -> &'static str {
        "SendGrid"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), TransportError> {
        // SendGrid rejects text/html listed before text/plain.
        let email = SendGridEmail {
            personalizations: vec![Personalization {
                to: vec![EmailAddress {
                    email: &self.settings.receiver,
                }],
            }],
            from: EmailAddress {
                email: &self.settings.sender,
            },
            subject,
            content: vec![
                Content {
                    content_type: "text/plain",
                    value: body.to_string(),
                },
                Content {
                    content_type: "text/html",
                    value: render_html(body),
                },
            ],
        };

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }

        info!("Email sent successfully. Status Code: {}", status.as_u16());
        Ok(())
    }
}

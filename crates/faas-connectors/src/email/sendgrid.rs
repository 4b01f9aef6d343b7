use super::{EmailInput, EmailTransport};
use crate::client::{expect_success, normalize_base_url, transport_error, TransportResult};
use crate::error::ConnectorResult;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

const SERVICE: &str = "sendgrid";
pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

/// SendGrid v3 mail-send transport
#[derive(Debug, Clone)]
pub struct SendGridTransport {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    name: &'a str,
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct MailSend<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

impl<'a> MailSend<'a> {
    fn from_input(input: &'a EmailInput) -> Self {
        // SendGrid requires text/plain to precede text/html
        let mut content = Vec::with_capacity(2);
        if !input.plain_text.is_empty() {
            content.push(Content {
                kind: "text/plain",
                value: &input.plain_text,
            });
        }
        if !input.html_text.is_empty() {
            content.push(Content {
                kind: "text/html",
                value: &input.html_text,
            });
        }

        Self {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &input.to_email,
                    name: &input.to_name,
                }],
            }],
            from: Address {
                email: &input.from_email,
                name: &input.from_name,
            },
            subject: &input.subject,
            content,
        }
    }
}

impl SendGridTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> ConnectorResult<Self> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }
}

#[async_trait]
impl EmailTransport for SendGridTransport {
    async fn send(&self, email: &EmailInput) -> TransportResult<JsonValue> {
        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&email.api_key)
            .json(&MailSend::from_input(email))
            .send()
            .await
            .map_err(transport_error(SERVICE))?;

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let (status, _) = expect_success(SERVICE, response).await?;
        tracing::debug!(status, "SendGrid accepted message");

        Ok(json!({ "status": status, "message_id": message_id }))
    }
}

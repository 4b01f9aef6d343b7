use super::{SmsInput, SmsTransport};
use crate::client::{expect_success, normalize_base_url, parse_body, transport_error, TransportResult};
use crate::error::ConnectorResult;
use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

const SERVICE: &str = "twilio";
pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// Twilio Programmable Messaging transport
#[derive(Debug, Clone)]
pub struct TwilioTransport {
    client: reqwest::Client,
    base_url: String,
}

impl TwilioTransport {
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

    fn form(message: &SmsInput) -> Vec<(&'static str, &str)> {
        let mut form = vec![("From", message.from.as_str()), ("To", message.to.as_str())];
        if !message.body.is_empty() {
            form.push(("Body", message.body.as_str()));
        }
        if !message.media_url.is_empty() {
            form.push(("MediaUrl", message.media_url.as_str()));
        }
        form
    }
}

#[async_trait]
impl SmsTransport for TwilioTransport {
    async fn send_message(&self, message: &SmsInput) -> TransportResult<JsonValue> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, message.account_sid
        );

        let response = self
            .client
            .post(url)
            .basic_auth(&message.account_sid, Some(&message.auth_token))
            .form(&Self::form(message))
            .send()
            .await
            .map_err(transport_error(SERVICE))?;

        let (_, body) = expect_success(SERVICE, response).await?;
        let body = parse_body(&body);

        Ok(json!({
            "sid": body.get("sid").cloned().unwrap_or(JsonValue::Null),
            "status": body.get("status").cloned().unwrap_or(JsonValue::Null),
        }))
    }
}

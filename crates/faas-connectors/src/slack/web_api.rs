use super::{ChatTransport, SlackInput};
use crate::client::{expect_success, normalize_base_url, parse_body, transport_error, TransportResult};
use crate::error::ConnectorResult;
use async_trait::async_trait;
use faas_core::ExecutionError;
use serde_json::{json, Value as JsonValue};

const SERVICE: &str = "slack";
pub const DEFAULT_BASE_URL: &str = "https://slack.com";

/// Slack Web API client for `chat.postMessage`
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    base_url: String,
}

impl SlackClient {
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
impl ChatTransport for SlackClient {
    async fn post_message(&self, message: &SlackInput) -> TransportResult<JsonValue> {
        let response = self
            .client
            .post(format!("{}/api/chat.postMessage", self.base_url))
            .bearer_auth(&message.api_token)
            .json(&json!({
                "channel": message.channel_id,
                "text": message.message,
            }))
            .send()
            .await
            .map_err(transport_error(SERVICE))?;

        let (_, body) = expect_success(SERVICE, response).await?;
        let body = parse_body(&body);

        // Slack reports most failures with a 200 and `"ok": false`
        if body.get("ok").and_then(JsonValue::as_bool) != Some(true) {
            let reason = body
                .get("error")
                .and_then(JsonValue::as_str)
                .unwrap_or("unknown_error");
            return Err(ExecutionError::provider(SERVICE, reason));
        }

        Ok(json!({
            "channel": body.get("channel").cloned().unwrap_or(JsonValue::Null),
            "ts": body.get("ts").cloned().unwrap_or(JsonValue::Null),
        }))
    }
}

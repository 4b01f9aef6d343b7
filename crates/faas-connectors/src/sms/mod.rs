//! `sms` action: SMS or MMS through a carrier API

mod twilio;

pub use twilio::TwilioTransport;

use crate::client::TransportResult;
use async_trait::async_trait;
use faas_core::{
    keys,
    validation::{require_all, require_any},
    Action, ActionConfig, ActionOutput, CredentialResolver, FaasResult, Payload,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const NAME: &str = "sms";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsInput {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
    pub body: String,
    /// Set for MMS
    pub media_url: String,
}

#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send_message(&self, message: &SmsInput) -> TransportResult<JsonValue>;
}

pub struct SmsAction {
    resolver: CredentialResolver,
    transport: Arc<dyn SmsTransport>,
}

impl SmsAction {
    pub fn new(resolver: CredentialResolver, transport: Arc<dyn SmsTransport>) -> Self {
        Self {
            resolver,
            transport,
        }
    }
}

#[async_trait]
impl Action for SmsAction {
    type Input = SmsInput;

    fn config(&self) -> ActionConfig {
        ActionConfig::new(NAME)
    }

    fn parse_payload(&self, payload: &Payload) -> FaasResult<SmsInput> {
        Ok(SmsInput {
            account_sid: self
                .resolver
                .resolve_field(payload, "account_sid", keys::TWILIO_ACCOUNT_SID),
            auth_token: self
                .resolver
                .resolve_field(payload, "auth_token", keys::TWILIO_AUTH_TOKEN),
            from: payload.required_str("from")?,
            to: payload.required_str("to")?,
            body: payload.str_or_default("body")?,
            media_url: payload.str_or_default("media_url")?,
        })
    }

    fn validate(&self, input: &SmsInput) -> FaasResult<()> {
        require_all(&[
            ("account_sid", input.account_sid.as_str()),
            ("auth_token", input.auth_token.as_str()),
            ("from", input.from.as_str()),
            ("to", input.to.as_str()),
        ])?;
        require_any(
            &[input.body.as_str(), input.media_url.as_str()],
            "at least one of body or media_url must be provided",
        )
    }

    async fn execute(&self, input: SmsInput) -> FaasResult<ActionOutput> {
        let response = self.transport.send_message(&input).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to send SMS");
            e
        })?;

        tracing::info!(
            sid = response.get("sid").and_then(JsonValue::as_str).unwrap_or("-"),
            status = response.get("status").and_then(JsonValue::as_str).unwrap_or("-"),
            "SMS sent successfully"
        );
        Ok(ActionOutput::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faas_core::{DynAction, FaasError, MapSource};
    use serde_json::json;

    struct AcceptAll;

    #[async_trait]
    impl SmsTransport for AcceptAll {
        async fn send_message(&self, message: &SmsInput) -> TransportResult<JsonValue> {
            Ok(json!({ "sid": "SM1", "status": "queued", "to": message.to }))
        }
    }

    fn action(source: MapSource) -> SmsAction {
        SmsAction::new(CredentialResolver::new(source), Arc::new(AcceptAll))
    }

    fn twilio_env() -> MapSource {
        MapSource::new()
            .with(keys::TWILIO_ACCOUNT_SID, "ACenv")
            .with(keys::TWILIO_AUTH_TOKEN, "env-token")
    }

    #[test]
    fn test_credentials_from_config() {
        let payload = Payload::new()
            .with("from", "+15550001111")
            .with("to", "+15550002222")
            .with("body", "hello");

        let input = action(twilio_env()).parse_payload(&payload).unwrap();
        assert_eq!(input.account_sid, "ACenv");
        assert_eq!(input.auth_token, "env-token");

        let payload = payload.with("account_sid", "ACpayload");
        let input = action(twilio_env()).parse_payload(&payload).unwrap();
        assert_eq!(input.account_sid, "ACpayload");
    }

    #[test]
    fn test_body_or_media_required() {
        let action = action(MapSource::new());
        let payload = Payload::from_value(json!({
            "account_sid": "AC123",
            "auth_token": "token",
            "from": "+15550001111",
            "to": "+15550002222"
        }))
        .unwrap();

        let input = action.parse_payload(&payload).unwrap();
        assert_eq!(
            action.validate(&input).unwrap_err().to_string(),
            "at least one of body or media_url must be provided"
        );

        let mms = action
            .parse_payload(&payload.clone().with("media_url", "https://example.com/cat.png"))
            .unwrap();
        assert!(action.validate(&mms).is_ok());
    }

    #[test]
    fn test_missing_credentials() {
        let action = action(MapSource::new());
        let payload = Payload::new()
            .with("from", "+15550001111")
            .with("to", "+15550002222")
            .with("body", "hi");

        let input = action.parse_payload(&payload).unwrap();
        assert_eq!(
            action.validate(&input).unwrap_err().to_string(),
            "missing required field: account_sid"
        );
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let action = action(twilio_env());
        let payload = Payload::new()
            .with("from", "+15550001111")
            .with("to", "+15550002222")
            .with("body", json!({ "text": "nested" }));

        let err = action.parse_payload(&payload).unwrap_err();
        assert!(matches!(err, FaasError::Parse { ref field, .. } if field == "body"));
    }

    #[tokio::test]
    async fn test_invoke() {
        let output = action(twilio_env())
            .invoke(
                &Payload::new()
                    .with("from", "+15550001111")
                    .with("to", "+15550002222")
                    .with("body", "hi"),
            )
            .await
            .unwrap();
        assert_eq!(output.payload()["status"], "queued");
    }
}

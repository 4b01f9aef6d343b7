//! `slack` action: post a text message to a channel

mod web_api;

pub use web_api::SlackClient;

use crate::client::TransportResult;
use async_trait::async_trait;
use faas_core::{
    keys, validation::require_all, Action, ActionConfig, ActionOutput, CredentialResolver,
    FaasResult, Payload,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const NAME: &str = "slack";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackInput {
    pub api_token: String,
    pub channel_id: String,
    pub message: String,
}

/// Posts a message to a chat channel.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_message(&self, message: &SlackInput) -> TransportResult<JsonValue>;
}

pub struct SlackAction {
    resolver: CredentialResolver,
    transport: Arc<dyn ChatTransport>,
}

impl SlackAction {
    pub fn new(resolver: CredentialResolver, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            resolver,
            transport,
        }
    }
}

#[async_trait]
impl Action for SlackAction {
    type Input = SlackInput;

    fn config(&self) -> ActionConfig {
        ActionConfig::new(NAME)
    }

    fn parse_payload(&self, payload: &Payload) -> FaasResult<SlackInput> {
        Ok(SlackInput {
            api_token: self
                .resolver
                .resolve_field(payload, "api_token", keys::SLACK_API_TOKEN),
            channel_id: payload.required_str("channel_id")?,
            message: payload.required_str("message")?,
        })
    }

    fn validate(&self, input: &SlackInput) -> FaasResult<()> {
        require_all(&[
            ("api_token", input.api_token.as_str()),
            ("channel_id", input.channel_id.as_str()),
            ("message", input.message.as_str()),
        ])
    }

    async fn execute(&self, input: SlackInput) -> FaasResult<ActionOutput> {
        let response = self.transport.post_message(&input).await.map_err(|e| {
            tracing::error!(channel = %input.channel_id, error = %e, "Failed to post slack message");
            e
        })?;
        Ok(ActionOutput::new(response))
    }
}

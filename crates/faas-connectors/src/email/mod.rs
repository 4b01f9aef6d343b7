//! `email` action: a single message through a mail provider

mod sendgrid;

pub use sendgrid::SendGridTransport;

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

pub const NAME: &str = "email";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailInput {
    pub api_key: String,
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub plain_text: String,
    pub html_text: String,
}

/// Delivers an already-validated email.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &EmailInput) -> TransportResult<JsonValue>;
}

pub struct EmailAction {
    resolver: CredentialResolver,
    transport: Arc<dyn EmailTransport>,
}

impl EmailAction {
    pub fn new(resolver: CredentialResolver, transport: Arc<dyn EmailTransport>) -> Self {
        Self {
            resolver,
            transport,
        }
    }
}

#[async_trait]
impl Action for EmailAction {
    type Input = EmailInput;

    fn config(&self) -> ActionConfig {
        ActionConfig::new(NAME)
    }

    fn parse_payload(&self, payload: &Payload) -> FaasResult<EmailInput> {
        Ok(EmailInput {
            api_key: self
                .resolver
                .resolve_field(payload, "api_key", keys::SENDGRID_API_KEY),
            from_email: payload.required_str("from_email")?,
            to_email: payload.required_str("to_email")?,
            subject: payload.required_str("subject")?,
            from_name: payload.str_or_default("from_name")?,
            to_name: payload.str_or_default("to_name")?,
            plain_text: payload.str_or_default("plain_text")?,
            html_text: payload.str_or_default("html_text")?,
        })
    }

    fn validate(&self, input: &EmailInput) -> FaasResult<()> {
        require_all(&[
            ("api_key", input.api_key.as_str()),
            ("from_email", input.from_email.as_str()),
            ("to_email", input.to_email.as_str()),
            ("subject", input.subject.as_str()),
        ])?;
        require_any(
            &[input.plain_text.as_str(), input.html_text.as_str()],
            "at least one of plain_text or html_text must be provided",
        )
    }

    async fn execute(&self, input: EmailInput) -> FaasResult<ActionOutput> {
        let response = self.transport.send(&input).await?;
        tracing::info!(to = %input.to_email, "Email sent successfully");
        Ok(ActionOutput::new(response))
    }
}

//! Action lifecycle contract
//!
//! Every action goes through `parse_payload` → `validate` → `execute`. The
//! parsed input is returned by value from the parse step and threaded through
//! the remaining steps, so action instances carry no per-call state and can be
//! shared between concurrent invocations.

use crate::error::FaasResult;
use crate::payload::Payload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Stable identity of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub name: String,
}

impl ActionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Result of a successful execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionOutput(JsonValue);

impl ActionOutput {
    /// Output for actions with nothing to report.
    pub fn empty() -> Self {
        Self(JsonValue::Null)
    }

    pub fn new(payload: JsonValue) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_payload(self) -> JsonValue {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }
}

/// A named capability with a typed input.
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// Parsed, typed form of the payload.
    type Input: Send;

    /// Must return the same value for the life of the process.
    fn config(&self) -> ActionConfig;

    /// Map payload fields onto the typed input, resolving credentials.
    fn parse_payload(&self, payload: &Payload) -> FaasResult<Self::Input>;

    /// Field-presence and cross-field rules.
    fn validate(&self, input: &Self::Input) -> FaasResult<()>;

    /// Perform the single external call for this invocation.
    async fn execute(&self, input: Self::Input) -> FaasResult<ActionOutput>;
}

/// Object-safe view of an [`Action`], as stored by the registry.
#[async_trait]
pub trait DynAction: Send + Sync {
    fn action_config(&self) -> ActionConfig;

    /// Run parse, validate and execute in order, stopping at the first error.
    async fn invoke(&self, payload: &Payload) -> FaasResult<ActionOutput>;
}

#[async_trait]
impl<A: Action> DynAction for A {
    fn action_config(&self) -> ActionConfig {
        self.config()
    }

    async fn invoke(&self, payload: &Payload) -> FaasResult<ActionOutput> {
        let input = self.parse_payload(payload)?;
        self.validate(&input)?;
        self.execute(input).await
    }
}

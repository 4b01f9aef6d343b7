//! `logger` action: write one line to the process log

use crate::client::TransportResult;
use async_trait::async_trait;
use faas_core::{Action, ActionConfig, ActionOutput, FaasResult, Payload};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const NAME: &str = "logger";
pub const LOG_TARGET: &str = "faas::logger";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerInput {
    pub message: String,
}

impl LoggerInput {
    pub fn line(&self) -> String {
        if self.message.is_empty() {
            "From Logger action: (no message provided)".to_string()
        } else {
            format!("From Logger action: {}", self.message)
        }
    }
}

pub trait LogSink: Send + Sync {
    fn write(&self, line: &str) -> TransportResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, line: &str) -> TransportResult<()> {
        tracing::info!(target: LOG_TARGET, "{}", line);
        Ok(())
    }
}

pub struct LoggerAction {
    sink: Arc<dyn LogSink>,
}

impl LoggerAction {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl Default for LoggerAction {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

#[async_trait]
impl Action for LoggerAction {
    type Input = LoggerInput;

    fn config(&self) -> ActionConfig {
        ActionConfig::new(NAME)
    }

    fn parse_payload(&self, payload: &Payload) -> FaasResult<LoggerInput> {
        Ok(LoggerInput {
            message: payload.str_or_default("message")?,
        })
    }

    fn validate(&self, _input: &LoggerInput) -> FaasResult<()> {
        Ok(())
    }

    async fn execute(&self, input: LoggerInput) -> FaasResult<ActionOutput> {
        self.sink.write(&input.line())?;
        Ok(ActionOutput::empty())
    }
}

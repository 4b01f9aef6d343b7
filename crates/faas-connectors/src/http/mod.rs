//! `http` action: arbitrary HTTP request with a JSON body

use crate::client::{expect_success, parse_body, transport_error, TransportResult};
use async_trait::async_trait;
use faas_core::{
    validation::require_all, Action, ActionConfig, ActionOutput, ExecutionError, FaasResult,
    Payload,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

pub const NAME: &str = "http";
const SERVICE: &str = "http";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpInput {
    pub url: String,
    pub method: String,
    /// Serialized as the request body; `null` when absent.
    pub request_body: JsonValue,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpInput) -> TransportResult<JsonValue>;
}

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn parse_method(method: &str) -> TransportResult<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| ExecutionError::Unsupported(format!("HTTP method '{}'", method)))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpInput) -> TransportResult<JsonValue> {
        let method = parse_method(&request.method)?;
        let url = url::Url::parse(&request.url)
            .map_err(|e| ExecutionError::Unsupported(format!("URL '{}': {}", request.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExecutionError::Unsupported(format!("URL scheme '{}'", url.scheme())));
        }

        let response = self
            .client
            .request(method, url)
            .json(&request.request_body)
            .send()
            .await
            .map_err(transport_error(SERVICE))?;

        let (status, body) = expect_success(SERVICE, response).await?;
        Ok(json!({ "status": status, "body": parse_body(&body) }))
    }
}

pub struct HttpAction {
    transport: Arc<dyn HttpTransport>,
}

impl HttpAction {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Action for HttpAction {
    type Input = HttpInput;

    fn config(&self) -> ActionConfig {
        ActionConfig::new(NAME)
    }

    fn parse_payload(&self, payload: &Payload) -> FaasResult<HttpInput> {
        Ok(HttpInput {
            url: payload.required_str("url")?,
            method: payload.required_str("method")?,
            request_body: payload.optional_value("request_body").unwrap_or(JsonValue::Null),
        })
    }

    fn validate(&self, input: &HttpInput) -> FaasResult<()> {
        require_all(&[("url", input.url.as_str()), ("method", input.method.as_str())])
    }

    async fn execute(&self, input: HttpInput) -> FaasResult<ActionOutput> {
        tracing::debug!(method = %input.method, url = %input.url, "Sending HTTP request");
        let response = self.transport.send(&input).await?;
        Ok(ActionOutput::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faas_core::FaasError;

    struct Echo;

    #[async_trait]
    impl HttpTransport for Echo {
        async fn send(&self, request: &HttpInput) -> TransportResult<JsonValue> {
            Ok(json!({ "status": 200, "body": request.request_body }))
        }
    }

    fn action() -> HttpAction {
        HttpAction::new(Arc::new(Echo))
    }

    #[test]
    fn test_request_body_defaults_to_null() {
        let input = action()
            .parse_payload(
                &Payload::new()
                    .with("url", "https://example.com")
                    .with("method", "GET"),
            )
            .unwrap();
        assert_eq!(input.request_body, JsonValue::Null);
    }

    #[test]
    fn test_any_method_string_passes_validation() {
        let action = action();
        let input = action
            .parse_payload(
                &Payload::new()
                    .with("url", "https://example.com")
                    .with("method", "FROBNICATE"),
            )
            .unwrap();
        assert!(action.validate(&input).is_ok());
    }

    #[test]
    fn test_missing_url() {
        let err = action()
            .parse_payload(&Payload::new().with("method", "GET"))
            .unwrap_err();
        assert!(matches!(err, FaasError::Parse { ref field, .. } if field == "url"));

        let action = action();
        let input = action
            .parse_payload(&Payload::new().with("url", "").with("method", "GET"))
            .unwrap();
        assert_eq!(
            action.validate(&input).unwrap_err().to_string(),
            "missing required field: url"
        );
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("post").unwrap(), Method::POST);
        assert_eq!(parse_method("PATCH").unwrap(), Method::PATCH);
        assert!(matches!(
            parse_method("NOT A METHOD"),
            Err(ExecutionError::Unsupported(_))
        ));
    }
}

//! Shared HTTP plumbing for the default transports

use crate::error::{ConnectorError, ConnectorResult};
use faas_core::ExecutionError;
use serde_json::Value as JsonValue;
#[cfg(unix)]
use std::path::PathBuf;
use std::time::Duration;

pub type TransportResult<T> = Result<T, ExecutionError>;

pub const DEFAULT_USER_AGENT: &str = concat!("faas/", env!("CARGO_PKG_VERSION"));

/// Options applied to the shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout; `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn client_builder(options: &ClientOptions) -> reqwest::ClientBuilder {
    let mut builder = reqwest::Client::builder().user_agent(options.user_agent.clone());
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    builder
}

pub fn build_client(options: &ClientOptions) -> ConnectorResult<reqwest::Client> {
    Ok(client_builder(options).build()?)
}

/// Client that sends every request over the Unix domain socket at `path`,
/// whatever host the request URL names.
#[cfg(unix)]
pub fn build_unix_client(
    options: &ClientOptions,
    path: PathBuf,
) -> ConnectorResult<reqwest::Client> {
    Ok(client_builder(options).unix_socket(path).build()?)
}

/// Validate a base URL and strip any trailing slash.
pub(crate) fn normalize_base_url(base_url: &str) -> ConnectorResult<String> {
    let parsed = url::Url::parse(base_url)
        .map_err(|e| ConnectorError::InvalidConfig(format!("Invalid base URL '{}': {}", base_url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(base_url.trim_end_matches('/').to_string()),
        other => Err(ConnectorError::InvalidConfig(format!(
            "Unsupported URL scheme '{}' in '{}'",
            other, base_url
        ))),
    }
}

pub(crate) fn transport_error(service: &'static str) -> impl Fn(reqwest::Error) -> ExecutionError {
    move |e| ExecutionError::transport(service, e)
}

/// Read the body and turn any non-2xx status into [`ExecutionError::Status`].
pub(crate) async fn expect_success(
    service: &'static str,
    response: reqwest::Response,
) -> TransportResult<(u16, String)> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error(service))?;
    if !status.is_success() {
        tracing::warn!(service, status = status.as_u16(), "Provider returned an error status");
        return Err(ExecutionError::status(service, status.as_u16(), body));
    }
    Ok((status.as_u16(), body))
}

/// Parse a response body as JSON, falling back to a plain string.
pub(crate) fn parse_body(body: &str) -> JsonValue {
    if body.is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| JsonValue::String(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.sendgrid.com/").unwrap(),
            "https://api.sendgrid.com"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:2375").unwrap(),
            "http://127.0.0.1:2375"
        );
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), JsonValue::Null);
        assert_eq!(parse_body(r#"{"ok":true}"#), json!({ "ok": true }));
        assert_eq!(parse_body("plain"), json!("plain"));
    }

    #[test]
    fn test_build_client() {
        let options = ClientOptions {
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        assert!(build_client(&options).is_ok());
        #[cfg(unix)]
        assert!(build_unix_client(&options, PathBuf::from("/var/run/docker.sock")).is_ok());
        assert!(DEFAULT_USER_AGENT.starts_with("faas/"));
    }
}

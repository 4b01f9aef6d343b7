use super::{GithubInput, GithubOperation, SourceHost};
use crate::client::{expect_success, normalize_base_url, parse_body, transport_error, TransportResult};
use crate::error::ConnectorResult;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value as JsonValue;

const SERVICE: &str = "github";
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// GitHub REST API v3 client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point at a GitHub Enterprise API root or a test server.
    pub fn with_base_url(mut self, base_url: &str) -> ConnectorResult<Self> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn call(
        &self,
        operation: GithubOperation,
        request: &GithubInput,
    ) -> TransportResult<JsonValue> {
        let url = format!("{}{}", self.base_url, operation.path(&request.repository));

        let mut builder = self
            .client
            .get(url)
            .header(ACCEPT, MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION);
        if !request.token.is_empty() {
            builder = builder.bearer_auth(&request.token);
        }

        let response = builder.send().await.map_err(transport_error(SERVICE))?;
        let (_, body) = expect_success(SERVICE, response).await?;
        Ok(parse_body(&body))
    }
}

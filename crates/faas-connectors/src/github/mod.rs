//! `github` action: read-only calls against a source-code host

mod rest;

pub use rest::GitHubClient;

use crate::client::TransportResult;
use async_trait::async_trait;
use faas_core::{
    keys, validation::require_all, Action, ActionConfig, ActionOutput, CredentialResolver,
    ExecutionError, FaasResult, Payload,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

pub const NAME: &str = "github";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubInput {
    /// `owner/name`
    pub repository: String,
    pub action: String,
    /// Optional; anonymous requests are subject to lower rate limits.
    pub token: String,
}

/// Operations the `action` field may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubOperation {
    GetRepository,
    ListIssues,
    ListPulls,
}

impl GithubOperation {
    pub fn parse(action: &str) -> TransportResult<Self> {
        match action {
            "get_repository" => Ok(Self::GetRepository),
            "list_issues" => Ok(Self::ListIssues),
            "list_pulls" => Ok(Self::ListPulls),
            other => Err(ExecutionError::Unsupported(format!(
                "github action '{}'",
                other
            ))),
        }
    }

    /// Path below the API root for `repository`.
    pub fn path(self, repository: &str) -> String {
        match self {
            Self::GetRepository => format!("/repos/{}", repository),
            Self::ListIssues => format!("/repos/{}/issues", repository),
            Self::ListPulls => format!("/repos/{}/pulls", repository),
        }
    }
}

impl fmt::Display for GithubOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetRepository => "get_repository",
            Self::ListIssues => "list_issues",
            Self::ListPulls => "list_pulls",
        };
        f.write_str(name)
    }
}

#[async_trait]
pub trait SourceHost: Send + Sync {
    async fn call(
        &self,
        operation: GithubOperation,
        request: &GithubInput,
    ) -> TransportResult<JsonValue>;
}

pub struct GithubAction {
    resolver: CredentialResolver,
    host: Arc<dyn SourceHost>,
}

impl GithubAction {
    pub fn new(resolver: CredentialResolver, host: Arc<dyn SourceHost>) -> Self {
        Self { resolver, host }
    }
}

#[async_trait]
impl Action for GithubAction {
    type Input = GithubInput;

    fn config(&self) -> ActionConfig {
        ActionConfig::new(NAME)
    }

    fn parse_payload(&self, payload: &Payload) -> FaasResult<GithubInput> {
        Ok(GithubInput {
            repository: payload.required_str("repository")?,
            action: payload.required_str("action")?,
            token: self
                .resolver
                .resolve_field(payload, "token", keys::GITHUB_TOKEN),
        })
    }

    fn validate(&self, input: &GithubInput) -> FaasResult<()> {
        require_all(&[
            ("repository", input.repository.as_str()),
            ("action", input.action.as_str()),
        ])
    }

    async fn execute(&self, input: GithubInput) -> FaasResult<ActionOutput> {
        let operation = GithubOperation::parse(&input.action)?;
        tracing::debug!(repository = %input.repository, %operation, "Calling GitHub");
        let body = self.host.call(operation, &input).await?;
        Ok(ActionOutput::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faas_core::{DynAction, FaasError, MapSource};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHost(AtomicUsize);

    #[async_trait]
    impl SourceHost for CountingHost {
        async fn call(
            &self,
            operation: GithubOperation,
            request: &GithubInput,
        ) -> TransportResult<JsonValue> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "path": operation.path(&request.repository), "token": request.token }))
        }
    }

    fn payload(action: &str) -> Payload {
        Payload::new()
            .with("repository", "octo/hello")
            .with("action", action)
    }

    #[test]
    fn test_token_is_optional() {
        let action = GithubAction::new(
            CredentialResolver::new(MapSource::new()),
            Arc::new(CountingHost::default()),
        );
        let input = action.parse_payload(&payload("get_repository")).unwrap();
        assert_eq!(input.token, "");
        assert!(action.validate(&input).is_ok());
    }

    #[test]
    fn test_missing_repository() {
        let action = GithubAction::new(
            CredentialResolver::new(MapSource::new()),
            Arc::new(CountingHost::default()),
        );
        let input = action
            .parse_payload(&Payload::new().with("repository", "").with("action", "list_issues"))
            .unwrap();
        assert_eq!(
            action.validate(&input).unwrap_err().to_string(),
            "missing required field: repository"
        );
    }

    #[tokio::test]
    async fn test_operation_paths_and_token() {
        let host = Arc::new(CountingHost::default());
        let action = GithubAction::new(
            CredentialResolver::new(MapSource::new().with(keys::GITHUB_TOKEN, "ghp_env")),
            host.clone(),
        );

        let output = action.invoke(&payload("list_pulls")).await.unwrap();
        assert_eq!(output.payload()["path"], "/repos/octo/hello/pulls");
        assert_eq!(output.payload()["token"], "ghp_env");
        assert_eq!(host.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_action_fails_at_execute() {
        let host = Arc::new(CountingHost::default());
        let action = GithubAction::new(CredentialResolver::new(MapSource::new()), host.clone());

        let input = action.parse_payload(&payload("delete_repository")).unwrap();
        assert!(action.validate(&input).is_ok());

        let err = action.execute(input).await.unwrap_err();
        assert!(matches!(
            err,
            FaasError::Execution(ExecutionError::Unsupported(_))
        ));
        assert_eq!(host.0.load(Ordering::SeqCst), 0);
    }
}

//! `docker_registry` action: pull an image and run a throwaway container

mod engine;

pub use engine::{DockerEngine, DEFAULT_HOST as DEFAULT_DOCKER_HOST};

use crate::client::TransportResult;
use async_trait::async_trait;
use faas_core::{
    keys, validation::require, Action, ActionConfig, ActionOutput, CredentialResolver, FaasError,
    FaasResult, Payload,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const NAME: &str = "docker_registry";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerRegistryInput {
    pub image: String,
    pub registry: String,
    pub registry_username: String,
    pub registry_password: String,
}

impl DockerRegistryInput {
    /// Image reference including the registry host when one is set.
    pub fn image_ref(&self) -> String {
        if self.registry.is_empty() {
            self.image.clone()
        } else {
            format!("{}/{}", self.registry.trim_end_matches('/'), self.image)
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.registry_username.is_empty() && !self.registry_password.is_empty()
    }
}

/// Pulls and runs a container image.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn run(&self, request: &DockerRegistryInput) -> TransportResult<JsonValue>;
}

pub struct DockerRegistryAction {
    resolver: CredentialResolver,
    runtime: Arc<dyn ContainerRuntime>,
}

impl DockerRegistryAction {
    pub fn new(resolver: CredentialResolver, runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { resolver, runtime }
    }
}

#[async_trait]
impl Action for DockerRegistryAction {
    type Input = DockerRegistryInput;

    fn config(&self) -> ActionConfig {
        ActionConfig::new(NAME)
    }

    fn parse_payload(&self, payload: &Payload) -> FaasResult<DockerRegistryInput> {
        Ok(DockerRegistryInput {
            image: payload.required_str("image")?,
            registry: payload.str_or_default("registry")?,
            registry_username: self.resolver.resolve_field(
                payload,
                "registry_username",
                keys::DOCKER_REGISTRY_USERNAME,
            ),
            registry_password: self.resolver.resolve_field(
                payload,
                "registry_password",
                keys::DOCKER_REGISTRY_PASSWORD,
            ),
        })
    }

    fn validate(&self, input: &DockerRegistryInput) -> FaasResult<()> {
        require("image", &input.image)?;

        if !input.registry.is_empty() {
            let has_username = !input.registry_username.is_empty();
            let has_password = !input.registry_password.is_empty();
            if has_username != has_password {
                return Err(FaasError::validation(
                    "when providing registry credentials, both username and password must be provided",
                ));
            }
        }
        Ok(())
    }

    async fn execute(&self, input: DockerRegistryInput) -> FaasResult<ActionOutput> {
        let output = self.runtime.run(&input).await?;
        Ok(ActionOutput::new(output))
    }
}

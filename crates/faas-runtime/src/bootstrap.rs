//! Wiring of the built-in functions

use crate::error::RuntimeResult;
use faas_config::FaasSettings;
use faas_connectors::{
    build_client, docker, email, github, http, logger, slack, sms, ChatTransport, ClientOptions,
    ContainerRuntime, DockerEngine, DockerRegistryAction, EmailAction, EmailTransport,
    GitHubClient, GithubAction, HttpAction, HttpTransport, LogSink, LoggerAction,
    ReqwestTransport, SendGridTransport, SlackAction, SlackClient, SmsAction, SmsTransport,
    SourceHost, TracingSink, TwilioTransport, DEFAULT_DOCKER_HOST,
};
use faas_core::{keys, ConfigSource, CredentialResolver, DynAction};
use faas_registry::Registry;
use std::sync::Arc;

/// Names registered by [`builtin_registry`], in registration order.
pub const BUILTIN_FUNCTIONS: [&str; 7] = [
    email::NAME,
    slack::NAME,
    sms::NAME,
    docker::NAME,
    http::NAME,
    logger::NAME,
    github::NAME,
];

/// External collaborators of the built-in functions.
#[derive(Clone)]
pub struct Transports {
    pub email: Arc<dyn EmailTransport>,
    pub chat: Arc<dyn ChatTransport>,
    pub sms: Arc<dyn SmsTransport>,
    pub containers: Arc<dyn ContainerRuntime>,
    pub http: Arc<dyn HttpTransport>,
    pub log: Arc<dyn LogSink>,
    pub source_host: Arc<dyn SourceHost>,
}

impl Transports {
    /// Default HTTP-backed transports sharing one client. The Docker engine
    /// gets its own client when it is reached over a Unix socket.
    pub fn from_settings(
        settings: &FaasSettings,
        source: &dyn ConfigSource,
    ) -> RuntimeResult<Self> {
        let mut options = ClientOptions {
            timeout: settings.http_timeout(),
            ..Default::default()
        };
        if let Some(user_agent) = &settings.http.user_agent {
            options.user_agent = user_agent.clone();
        }
        let client = build_client(&options)?;
        let endpoints = &settings.endpoints;

        let mut sendgrid = SendGridTransport::new(client.clone());
        if let Some(url) = &endpoints.sendgrid {
            sendgrid = sendgrid.with_base_url(url)?;
        }
        let mut slack = SlackClient::new(client.clone());
        if let Some(url) = &endpoints.slack {
            slack = slack.with_base_url(url)?;
        }
        let mut twilio = TwilioTransport::new(client.clone());
        if let Some(url) = &endpoints.twilio {
            twilio = twilio.with_base_url(url)?;
        }
        let mut github = GitHubClient::new(client.clone());
        if let Some(url) = &endpoints.github {
            github = github.with_base_url(url)?;
        }
        let docker_host = docker_host(settings, source);
        tracing::debug!(host = %docker_host, "Docker Engine endpoint");
        let docker = match docker_host.strip_prefix("unix://") {
            Some(_) => DockerEngine::connect(&docker_host, &options)?,
            None => DockerEngine::new(client.clone()).with_base_url(&docker_host)?,
        }
        .with_wait_timeout(settings.docker_wait_timeout());

        Ok(Self {
            email: Arc::new(sendgrid),
            chat: Arc::new(slack),
            sms: Arc::new(twilio),
            containers: Arc::new(docker),
            http: Arc::new(ReqwestTransport::new(client)),
            log: Arc::new(TracingSink),
            source_host: Arc::new(github),
        })
    }
}

/// Docker Engine address: the settings endpoint, else `DOCKER_HOST`, else the
/// platform default.
pub fn docker_host(settings: &FaasSettings, source: &dyn ConfigSource) -> String {
    settings
        .endpoints
        .docker_host
        .clone()
        .or_else(|| source.lookup(keys::DOCKER_HOST).filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_DOCKER_HOST.to_string())
}

/// One instance of each built-in, ready for [`Registry::register_all`].
pub fn builtin_actions(
    transports: Transports,
    resolver: CredentialResolver,
) -> Vec<Arc<dyn DynAction>> {
    vec![
        Arc::new(EmailAction::new(resolver.clone(), transports.email)),
        Arc::new(SlackAction::new(resolver.clone(), transports.chat)),
        Arc::new(SmsAction::new(resolver.clone(), transports.sms)),
        Arc::new(DockerRegistryAction::new(
            resolver.clone(),
            transports.containers,
        )),
        Arc::new(HttpAction::new(transports.http)),
        Arc::new(LoggerAction::new(transports.log)),
        Arc::new(GithubAction::new(resolver, transports.source_host)),
    ]
}

pub fn builtin_registry(
    transports: Transports,
    resolver: CredentialResolver,
) -> RuntimeResult<Registry> {
    let mut registry = Registry::new();
    registry.register_all(builtin_actions(transports, resolver))?;
    tracing::debug!(functions = registry.len(), "Registered built-in functions");
    Ok(registry)
}

/// Registry with the default transports configured from `settings`.
pub fn default_registry(
    settings: &FaasSettings,
    source: Arc<dyn ConfigSource>,
) -> RuntimeResult<Registry> {
    let transports = Transports::from_settings(settings, source.as_ref())?;
    builtin_registry(transports, CredentialResolver::from_shared(source))
}

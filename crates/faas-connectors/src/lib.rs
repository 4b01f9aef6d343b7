//! Built-in actions and the transports they delegate to
//!
//! Each module pairs one [`faas_core::Action`] with a transport trait and a
//! default HTTP-backed implementation of it.

pub mod client;
pub mod docker;
pub mod email;
pub mod error;
pub mod github;
pub mod http;
pub mod logger;
pub mod slack;
pub mod sms;

// Re-export commonly used types
#[cfg(unix)]
pub use client::build_unix_client;
pub use client::{build_client, ClientOptions, TransportResult};
pub use docker::{
    ContainerRuntime, DockerEngine, DockerRegistryAction, DockerRegistryInput, DEFAULT_DOCKER_HOST,
};
pub use email::{EmailAction, EmailInput, EmailTransport, SendGridTransport};
pub use error::{ConnectorError, ConnectorResult};
pub use github::{GitHubClient, GithubAction, GithubInput, GithubOperation, SourceHost};
pub use http::{HttpAction, HttpInput, HttpTransport, ReqwestTransport};
pub use logger::{LogSink, LoggerAction, LoggerInput, TracingSink};
pub use slack::{ChatTransport, SlackAction, SlackClient, SlackInput};
pub use sms::{SmsAction, SmsInput, SmsTransport, TwilioTransport};

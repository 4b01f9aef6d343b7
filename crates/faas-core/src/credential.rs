//! Credential resolution with payload-override precedence
//!
//! A credential is taken from the payload when the caller supplied a non-empty
//! string for it, and otherwise looked up by key in an injected
//! [`ConfigSource`]. Nothing is cached: every resolution queries the source.

use crate::error::{FaasError, FaasResult};
use crate::payload::Payload;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Standard configuration keys consulted by the built-in actions.
pub mod keys {
    pub const SENDGRID_API_KEY: &str = "SENDGRID_API_KEY";
    pub const SLACK_API_TOKEN: &str = "SLACK_API_TOKEN";
    pub const TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
    pub const TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
    pub const DOCKER_REGISTRY_USERNAME: &str = "DOCKER_REGISTRY_USERNAME";
    pub const DOCKER_REGISTRY_PASSWORD: &str = "DOCKER_REGISTRY_PASSWORD";
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";

    /// Docker Engine endpoint; not a credential, so not part of [`ALL`].
    pub const DOCKER_HOST: &str = "DOCKER_HOST";

    /// Every credential key.
    pub const ALL: &[&str] = &[
        SENDGRID_API_KEY,
        SLACK_API_TOKEN,
        TWILIO_ACCOUNT_SID,
        TWILIO_AUTH_TOKEN,
        DOCKER_REGISTRY_USERNAME,
        DOCKER_REGISTRY_PASSWORD,
        GITHUB_TOKEN,
    ];
}

/// Process-wide configuration lookup. Absence is not an error.
pub trait ConfigSource: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for Arc<T> {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Box<T> {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory source, used for settings files and tests.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, String>> for MapSource {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl ConfigSource for MapSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Resolves secrets from an explicit value or a configured source.
#[derive(Clone)]
pub struct CredentialResolver {
    source: Arc<dyn ConfigSource>,
}

impl CredentialResolver {
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_shared(source: Arc<dyn ConfigSource>) -> Self {
        Self { source }
    }

    /// Resolver backed by the process environment.
    pub fn from_env() -> Self {
        Self::new(EnvSource)
    }

    /// Return `explicit` when it is a non-empty string, otherwise the value
    /// configured under `key`, otherwise the empty string.
    pub fn resolve(&self, explicit: Option<&JsonValue>, key: &str) -> String {
        if let Some(JsonValue::String(value)) = explicit {
            if !value.is_empty() {
                return value.clone();
            }
        }
        self.source.lookup(key).unwrap_or_default()
    }

    /// Like [`resolve`](Self::resolve) but an empty result is an error.
    pub fn resolve_required(
        &self,
        explicit: Option<&JsonValue>,
        key: &str,
        field: &str,
    ) -> FaasResult<String> {
        let value = self.resolve(explicit, key);
        if value.is_empty() {
            return Err(FaasError::MissingCredential {
                field: field.to_string(),
                key: key.to_string(),
            });
        }
        Ok(value)
    }

    /// Resolve the payload field `field`, falling back to `key`.
    pub fn resolve_field(&self, payload: &Payload, field: &str, key: &str) -> String {
        self.resolve(payload.get(field), key)
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver").finish_non_exhaustive()
    }
}

//! Typed settings file contents

use crate::error::{ConfigError, ConfigResult};
use faas_core::MapSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_DOCKER_WAIT_SECS: u64 = 15;

/// Root of a settings file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaasSettings {
    /// Credential values keyed by source key, e.g. `SENDGRID_API_KEY`.
    pub credentials: HashMap<String, String>,
    pub endpoints: Endpoints,
    pub http: HttpSettings,
    pub docker: DockerSettings,
}

/// Base URL overrides for the default transports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Endpoints {
    pub sendgrid: Option<String>,
    pub slack: Option<String>,
    pub twilio: Option<String>,
    pub github: Option<String>,
    /// Docker Engine API address (`unix:///path`, `tcp://host:port` or an
    /// `http(s)://` URL). Falls back to `DOCKER_HOST` when unset.
    pub docker_host: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DockerSettings {
    /// How long to wait for the container before stopping it.
    pub wait_timeout_secs: u64,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            wait_timeout_secs: DEFAULT_DOCKER_WAIT_SECS,
        }
    }
}

impl FaasSettings {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.docker.wait_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "docker.wait_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let urls = [
            ("endpoints.sendgrid", &self.endpoints.sendgrid),
            ("endpoints.slack", &self.endpoints.slack),
            ("endpoints.twilio", &self.endpoints.twilio),
            ("endpoints.github", &self.endpoints.github),
        ];
        for (field, value) in urls {
            if let Some(url) = value {
                check_scheme(field, url, &["http://", "https://"])?;
            }
        }
        if let Some(host) = &self.endpoints.docker_host {
            check_scheme(
                "endpoints.docker_host",
                host,
                &["unix://", "tcp://", "http://", "https://"],
            )?;
        }

        for key in self.credentials.keys() {
            if key.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "credentials contains an empty key".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Credentials section as a lookup source.
    pub fn credential_source(&self) -> MapSource {
        MapSource::from(self.credentials.clone())
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http.timeout_secs.map(Duration::from_secs)
    }

    pub fn docker_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.docker.wait_timeout_secs)
    }
}

fn check_scheme(field: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if allowed.iter().any(|scheme| value.starts_with(scheme)) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{} must start with one of {:?}, got '{}'",
            field, allowed, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faas_core::ConfigSource;

    #[test]
    fn test_defaults() {
        let settings = FaasSettings::default();
        assert_eq!(settings.docker_wait_timeout(), Duration::from_secs(15));
        assert_eq!(settings.http_timeout(), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let mut settings = FaasSettings::default();
        settings.docker.wait_timeout_secs = 0;
        assert!(settings.validate().is_err());

        let mut settings = FaasSettings::default();
        settings.http.timeout_secs = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_endpoint_schemes() {
        let mut settings = FaasSettings::default();
        settings.endpoints.docker_host = Some("tcp://127.0.0.1:2375".into());
        settings.endpoints.github = Some("https://ghe.example.com/api/v3".into());
        assert!(settings.validate().is_ok());
        settings.endpoints.docker_host = Some("unix:///var/run/docker.sock".into());
        assert!(settings.validate().is_ok());

        settings.endpoints.slack = Some("slack.com".into());
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("endpoints.slack"));
    }

    #[test]
    fn test_credential_source() {
        let mut settings = FaasSettings::default();
        settings
            .credentials
            .insert("GITHUB_TOKEN".into(), "ghp_file".into());

        let source = settings.credential_source();
        assert_eq!(source.lookup("GITHUB_TOKEN").as_deref(), Some("ghp_file"));
        assert_eq!(source.lookup("SLACK_API_TOKEN"), None);
    }
}

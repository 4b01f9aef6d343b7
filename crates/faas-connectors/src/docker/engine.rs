use super::{ContainerRuntime, DockerRegistryInput};
use crate::client::{
    build_client, expect_success, normalize_base_url, parse_body, transport_error, ClientOptions,
    TransportResult,
};
use crate::error::{ConnectorError, ConnectorResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use faas_core::ExecutionError;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

const SERVICE: &str = "docker";
pub const DEFAULT_BASE_URL: &str = "http://localhost:2375";
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(15);
/// Extra time the wait request gets on top of the wait timeout, so the
/// client's own timeout never fires first.
const WAIT_REQUEST_MARGIN: Duration = Duration::from_secs(5);
/// Host used when neither the settings nor `DOCKER_HOST` name one.
#[cfg(unix)]
pub const DEFAULT_HOST: &str = "unix:///var/run/docker.sock";
#[cfg(not(unix))]
pub const DEFAULT_HOST: &str = "tcp://localhost:2375";
/// Requests over a Unix socket still need an authority in the URL.
const UNIX_BASE_URL: &str = "http://localhost";
const CONTAINER_CMD: [&str; 2] = ["echo", "Hello from Docker!"];

/// Docker Engine API client reached over TCP or a Unix socket, addressed
/// the way `DOCKER_HOST` is (`tcp://`, `unix://`, `http(s)://`).
#[derive(Debug, Clone)]
pub struct DockerEngine {
    client: reqwest::Client,
    base_url: String,
    wait_timeout: Duration,
}

/// Split an image reference into the `fromImage` and `tag` query values the
/// Engine API expects. Digests are passed through untouched.
fn split_reference(reference: &str) -> (&str, Option<&str>) {
    if reference.contains('@') {
        return (reference, None);
    }
    let name_start = reference.rfind('/').map(|i| i + 1).unwrap_or(0);
    match reference[name_start..].rfind(':') {
        Some(i) => {
            let split = name_start + i;
            (&reference[..split], Some(&reference[split + 1..]))
        }
        None => (reference, Some("latest")),
    }
}

/// Value for the `X-Registry-Auth` header.
fn registry_auth(request: &DockerRegistryInput) -> String {
    let auth = json!({
        "username": request.registry_username,
        "password": request.registry_password,
        "serveraddress": request.registry,
    });
    URL_SAFE.encode(auth.to_string())
}

/// The pull endpoint streams progress as JSON lines and reports failures
/// inside the stream with a 200 status.
fn pull_stream_error(body: &str) -> Option<String> {
    body.lines()
        .filter_map(|line| serde_json::from_str::<JsonValue>(line).ok())
        .find_map(|event| {
            event
                .get("error")
                .and_then(JsonValue::as_str)
                .map(str::to_string)
        })
}

impl DockerEngine {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    /// Accepts `tcp://host:port` as well as `http(s)://` URLs.
    pub fn with_base_url(mut self, base_url: &str) -> ConnectorResult<Self> {
        let base_url = match base_url.strip_prefix("tcp://") {
            Some(rest) => format!("http://{}", rest),
            None => base_url.to_string(),
        };
        self.base_url = normalize_base_url(&base_url)?;
        Ok(self)
    }

    /// Build an engine for a `DOCKER_HOST`-style address with its own client.
    pub fn connect(host: &str, options: &ClientOptions) -> ConnectorResult<Self> {
        match host.strip_prefix("unix://") {
            Some(path) => Self::connect_unix(path, options),
            None => Self::new(build_client(options)?).with_base_url(host),
        }
    }

    #[cfg(unix)]
    fn connect_unix(path: &str, options: &ClientOptions) -> ConnectorResult<Self> {
        if path.is_empty() {
            return Err(ConnectorError::InvalidConfig(
                "unix:// Docker host needs a socket path".to_string(),
            ));
        }
        let client = crate::client::build_unix_client(options, path.into())?;
        Ok(Self {
            client,
            base_url: UNIX_BASE_URL.to_string(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        })
    }

    #[cfg(not(unix))]
    fn connect_unix(path: &str, _options: &ClientOptions) -> ConnectorResult<Self> {
        Err(ConnectorError::InvalidConfig(format!(
            "Unix socket Docker host 'unix://{}' is not supported on this platform",
            path
        )))
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    async fn pull(&self, request: &DockerRegistryInput, image_ref: &str) -> TransportResult<()> {
        let (from_image, tag) = split_reference(image_ref);
        let mut query = vec![("fromImage", from_image)];
        if let Some(tag) = tag {
            query.push(("tag", tag));
        }

        let mut builder = self
            .client
            .post(format!("{}/images/create", self.base_url))
            .query(&query);
        if request.has_credentials() {
            builder = builder.header("X-Registry-Auth", registry_auth(request));
        }

        let response = builder.send().await.map_err(transport_error(SERVICE))?;
        let (_, body) = expect_success(SERVICE, response).await?;
        if let Some(message) = pull_stream_error(&body) {
            return Err(ExecutionError::provider(SERVICE, message));
        }
        tracing::debug!(image = %image_ref, "Image pulled");
        Ok(())
    }

    async fn create(&self, image_ref: &str) -> TransportResult<String> {
        let response = self
            .client
            .post(format!("{}/containers/create", self.base_url))
            .json(&json!({ "Image": image_ref, "Cmd": CONTAINER_CMD }))
            .send()
            .await
            .map_err(transport_error(SERVICE))?;

        let (_, body) = expect_success(SERVICE, response).await?;
        parse_body(&body)
            .get("Id")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| ExecutionError::provider(SERVICE, "container create returned no Id"))
    }

    async fn post_container(&self, id: &str, op: &str) -> TransportResult<String> {
        let response = self
            .client
            .post(format!("{}/containers/{}/{}", self.base_url, id, op))
            .send()
            .await
            .map_err(transport_error(SERVICE))?;
        let (_, body) = expect_success(SERVICE, response).await?;
        Ok(body)
    }

    /// Wait for the container to stop. On timeout the container is stopped
    /// and `None` is returned.
    async fn wait(&self, id: &str) -> TransportResult<Option<i64>> {
        let wait = self
            .client
            .post(format!("{}/containers/{}/wait", self.base_url, id))
            .query(&[("condition", "not-running")])
            .timeout(self.wait_timeout + WAIT_REQUEST_MARGIN)
            .send();

        let response = match tokio::time::timeout(self.wait_timeout, wait).await {
            Ok(Ok(response)) => Some(response),
            Ok(Err(e)) if e.is_timeout() => None,
            Ok(Err(e)) => return Err(ExecutionError::transport(SERVICE, e)),
            Err(_) => None,
        };

        match response {
            Some(response) => {
                let (_, body) = expect_success(SERVICE, response).await?;
                Ok(parse_body(&body).get("StatusCode").and_then(JsonValue::as_i64))
            }
            None => {
                tracing::warn!(
                    container = %id,
                    timeout = ?self.wait_timeout,
                    "Container did not finish in time, stopping it"
                );
                self.post_container(id, "stop").await?;
                Ok(None)
            }
        }
    }

    async fn remove(&self, id: &str) -> TransportResult<()> {
        let response = self
            .client
            .delete(format!("{}/containers/{}", self.base_url, id))
            .send()
            .await
            .map_err(transport_error(SERVICE))?;
        expect_success(SERVICE, response).await?;
        Ok(())
    }
}

#[async_trait]
impl ContainerRuntime for DockerEngine {
    async fn run(&self, request: &DockerRegistryInput) -> TransportResult<JsonValue> {
        let image_ref = request.image_ref();
        self.pull(request, &image_ref).await?;
        let id = self.create(&image_ref).await?;

        let outcome = async {
            self.post_container(&id, "start").await?;
            self.wait(&id).await
        }
        .await;

        // The container is removed whatever happened after creation
        let removed = self.remove(&id).await;
        let exit_code = outcome?;
        removed?;

        tracing::info!(image = %image_ref, container = %id, ?exit_code, "Container finished");
        Ok(json!({
            "image": image_ref,
            "container_id": id,
            "exit_code": exit_code,
            "timed_out": exit_code.is_none(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    #[test]
    fn test_split_reference() {
        assert_eq!(split_reference("nginx"), ("nginx", Some("latest")));
        assert_eq!(split_reference("nginx:1.25"), ("nginx", Some("1.25")));
        assert_eq!(
            split_reference("localhost:5000/team/app"),
            ("localhost:5000/team/app", Some("latest"))
        );
        assert_eq!(
            split_reference("localhost:5000/app:v2"),
            ("localhost:5000/app", Some("v2"))
        );
        assert_eq!(split_reference("app@sha256:abc"), ("app@sha256:abc", None));
    }

    #[test]
    fn test_registry_auth_header() {
        let request = DockerRegistryInput {
            image: "app".into(),
            registry: "registry.example.com".into(),
            registry_username: "u".into(),
            registry_password: "p".into(),
        };
        let decoded = URL_SAFE.decode(registry_auth(&request)).unwrap();
        let value: JsonValue = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(value["username"], "u");
        assert_eq!(value["serveraddress"], "registry.example.com");
    }

    #[test]
    fn test_pull_stream_error() {
        let body = "{\"status\":\"Pulling from library/nginx\"}\n{\"error\":\"manifest unknown\"}\n";
        assert_eq!(pull_stream_error(body).as_deref(), Some("manifest unknown"));
        assert_eq!(pull_stream_error("{\"status\":\"Done\"}"), None);
    }

    #[test]
    fn test_tcp_base_url() {
        let client = reqwest::Client::new();
        let engine = DockerEngine::new(client)
            .with_base_url("tcp://127.0.0.1:2375")
            .unwrap();
        assert_eq!(engine.base_url, "http://127.0.0.1:2375");
    }

    #[test]
    fn test_connect_hosts() {
        let options = ClientOptions::default();
        let engine = DockerEngine::connect("tcp://10.0.0.5:2376", &options).unwrap();
        assert_eq!(engine.base_url, "http://10.0.0.5:2376");

        #[cfg(unix)]
        {
            let engine = DockerEngine::connect("unix:///var/run/docker.sock", &options).unwrap();
            assert_eq!(engine.base_url, UNIX_BASE_URL);
            assert!(DockerEngine::connect("unix://", &options).is_err());
        }

        assert!(DockerEngine::connect("ssh://host", &options).is_err());
        assert!(DockerEngine::new(reqwest::Client::new())
            .with_base_url("unix:///var/run/docker.sock")
            .is_err());
    }
}

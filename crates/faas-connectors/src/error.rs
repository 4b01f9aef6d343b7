/// Errors raised while constructing transports (not while executing them).
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;

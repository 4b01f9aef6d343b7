use std::time::Duration;
use thiserror::Error;

pub type FaasResult<T> = Result<T, FaasError>;

/// Errors surfaced by registration and by every step of an invocation.
#[derive(Debug, Error)]
pub enum FaasError {
    #[error("function with name {0} already exists")]
    DuplicateName(String),

    #[error("function with name {0} does not exist")]
    NotFound(String),

    #[error("invalid payload field '{field}': {reason}")]
    Parse { field: String, reason: String },

    #[error("{0}")]
    Validation(String),

    #[error("missing required credential: {field} (provide in payload or set {key})")]
    MissingCredential { field: String, key: String },

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Failures reported by an external transport collaborator.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("{service} API error: status code {status}, body: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },

    #[error("{service} request failed: {message}")]
    Transport { service: String, message: String },

    #[error("{service} error: {message}")]
    Provider { service: String, message: String },

    #[error("{service} timed out after {after:?}")]
    TimedOut { service: String, after: Duration },

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// Coarse classification of a [`FaasError`], for callers that map failures
/// onto another protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    NotFound,
    BadInput,
    Downstream,
}

impl ErrorKind {
    /// HTTP status an HTTP-facing wrapper should answer with.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::Conflict => 409,
            ErrorKind::NotFound => 404,
            ErrorKind::BadInput => 400,
            ErrorKind::Downstream => 502,
        }
    }
}

impl FaasError {
    pub fn parse(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Validation failure for a required field that resolved to an empty value.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("missing required field: {}", field))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FaasError::DuplicateName(_) => ErrorKind::Conflict,
            FaasError::NotFound(_) => ErrorKind::NotFound,
            FaasError::Parse { .. }
            | FaasError::Validation(_)
            | FaasError::MissingCredential { .. } => ErrorKind::BadInput,
            FaasError::Execution(_) => ErrorKind::Downstream,
        }
    }
}

impl ExecutionError {
    pub fn status(service: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            service: service.into(),
            status,
            body: body.into(),
        }
    }

    pub fn transport(service: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            service: service.into(),
            message: err.to_string(),
        }
    }

    pub fn provider(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            service: service.into(),
            message: message.into(),
        }
    }
}

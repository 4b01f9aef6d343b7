//! Error types for the CLI

use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] faas_config::ConfigError),

    #[error("{0}")]
    Runtime(#[from] faas_runtime::RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Missing configuration keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("General error: {0}")]
    General(String),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Config error: {0}")]
    Config(#[from] faas_config::ConfigError),

    #[error("Connector setup error: {0}")]
    Connector(#[from] faas_connectors::ConnectorError),

    #[error(transparent)]
    Function(#[from] faas_core::FaasError),
}

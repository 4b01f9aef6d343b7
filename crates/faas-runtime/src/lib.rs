pub mod bootstrap;
pub mod error;
pub mod execution;

pub use bootstrap::{
    builtin_actions, builtin_registry, default_registry, docker_host, Transports,
    BUILTIN_FUNCTIONS,
};
pub use error::{RuntimeError, RuntimeResult};
pub use execution::{execute_function, ExecutionMetadata, ExecutionOptions, ExecutionResult};

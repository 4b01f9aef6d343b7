pub mod action;
pub mod credential;
pub mod error;
pub mod payload;
pub mod sanitization;
pub mod validation;

// Re-export commonly used types
pub use action::{Action, ActionConfig, ActionOutput, DynAction};
pub use credential::{keys, ConfigSource, CredentialResolver, EnvSource, MapSource};
pub use error::{ErrorKind, ExecutionError, FaasError, FaasResult};
pub use payload::Payload;
pub use sanitization::{is_sensitive_field, sanitize_json_value, sanitize_payload};

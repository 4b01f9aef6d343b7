//! Settings, `.env` files and layered configuration sources

pub mod dotenv;
pub mod error;
pub mod loader;
pub mod settings;
pub mod source;

// Re-export commonly used types
pub use dotenv::DotEnv;
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_settings, parse_settings, FileFormat};
pub use settings::{DockerSettings, Endpoints, FaasSettings, HttpSettings};
pub use source::{missing_keys, LayeredSource};

pub mod check_env;
pub mod execute;
pub mod list;

// Re-export command handlers
pub use check_env::CheckEnvCommand;
pub use execute::ExecuteCommand;
pub use list::ListCommand;

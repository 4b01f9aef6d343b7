//! Utility functions for the CLI

use crate::error::{CliError, CliResult};
use colored::{ColoredString, Colorize};
use faas_config::{load_settings, DotEnv, FaasSettings, LayeredSource};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize tracing; `RUST_LOG` overrides the default level.
pub fn init_tracing(verbose: bool) -> CliResult<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::General(format!("Failed to set tracing subscriber: {}", e)))?;

    Ok(())
}

/// Utility for colored console output
pub struct ColoredOutput;

impl ColoredOutput {
    pub fn success(msg: &str) -> ColoredString {
        msg.green().bold()
    }

    pub fn error(msg: &str) -> ColoredString {
        msg.red().bold()
    }

    pub fn warning(msg: &str) -> ColoredString {
        msg.yellow().bold()
    }

    pub fn dim(msg: &str) -> ColoredString {
        msg.dimmed()
    }

    pub fn highlight(msg: &str) -> ColoredString {
        msg.cyan().bold()
    }
}

/// Format duration in a human-readable way
pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms < 1000 {
        format!("{}ms", duration_ms)
    } else if duration_ms < 60_000 {
        format!("{:.1}s", duration_ms as f64 / 1000.0)
    } else {
        format!("{:.1}m", duration_ms as f64 / 60_000.0)
    }
}

/// Settings plus the configuration source built from them.
pub struct Environment {
    pub settings: FaasSettings,
    pub source: LayeredSource,
}

/// Load the optional settings file and `.env` file.
pub fn load_environment(config: Option<&Path>, env_file: &Path) -> CliResult<Environment> {
    let settings = match config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::FileNotFound(path.display().to_string()));
            }
            load_settings(path)?
        }
        None => FaasSettings::default(),
    };
    let dotenv = DotEnv::load(env_file)?;
    let source = LayeredSource::standard(&settings, dotenv);
    Ok(Environment { settings, source })
}

/// Read a payload from either command line argument or file
pub fn read_input_data(input: Option<String>, input_file: Option<PathBuf>) -> CliResult<JsonValue> {
    match (input, input_file) {
        (Some(input_str), None) => serde_json::from_str(&input_str)
            .map_err(|e| CliError::InvalidArgument(format!("Invalid JSON input: {}", e))),
        (None, Some(path)) => {
            if !path.exists() {
                return Err(CliError::FileNotFound(path.display().to_string()));
            }
            let content = std::fs::read_to_string(&path)?;

            // Try to parse as JSON first, then YAML
            if let Ok(json_data) = serde_json::from_str::<JsonValue>(&content) {
                Ok(json_data)
            } else {
                serde_yaml::from_str(&content).map_err(|e| {
                    CliError::InvalidArgument(format!(
                        "Invalid JSON/YAML input file '{}': {}",
                        path.display(),
                        e
                    ))
                })
            }
        }
        (None, None) => Ok(serde_json::json!({})),
        (Some(_), Some(_)) => Err(CliError::InvalidArgument(
            "Cannot specify both --input and --input-file".to_string(),
        )),
    }
}

//! Function execution command

use crate::{
    error::{CliError, CliResult},
    utils::{format_duration, read_input_data, ColoredOutput, Environment},
};
use faas_core::sanitize_json_value;
use faas_runtime::{default_registry, execute_function, ExecutionOptions, ExecutionResult};
use serde_json::{json, Value as JsonValue};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct ExecuteCommand {
    pub name: String,
    pub input: Option<String>,
    pub input_file: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub pretty: bool,
    pub show_metadata: bool,
}

impl ExecuteCommand {
    pub async fn run(self, env: Environment) -> CliResult<()> {
        let input_data = read_input_data(self.input, self.input_file)?;
        debug!(input = %sanitize_json_value(&input_data), "Parsed input");

        let registry = default_registry(&env.settings, Arc::new(env.source))?;
        let options = ExecutionOptions {
            timeout: self.timeout.map(Duration::from_secs),
        };
        let result = execute_function(&registry, &self.name, input_data, options).await?;

        Self::display_result(&result, self.pretty, self.show_metadata)?;

        if result.success {
            eprintln!(
                "{} {} {}",
                ColoredOutput::success("✓"),
                self.name,
                ColoredOutput::dim(&format!(
                    "completed in {}",
                    format_duration(result.metadata.duration_ms)
                ))
            );
            Ok(())
        } else {
            Err(CliError::ExecutionFailed(
                result.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    fn display_result(result: &ExecutionResult, pretty: bool, show_metadata: bool) -> CliResult<()> {
        let output_data = if show_metadata {
            json!({
                "success": result.success,
                "output": result.output,
                "error": result.error,
                "metadata": result.metadata,
            })
        } else if result.success {
            result.output.clone().unwrap_or(JsonValue::Null)
        } else {
            // The error is reported on stderr
            return Ok(());
        };

        let text = if pretty {
            serde_json::to_string_pretty(&output_data)?
        } else {
            serde_json::to_string(&output_data)?
        };
        println!("{}", text);
        Ok(())
    }
}

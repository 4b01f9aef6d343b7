//! List registered functions

use crate::{
    cli::ListFormat,
    error::CliResult,
    utils::{ColoredOutput, Environment},
};
use faas_runtime::default_registry;
use std::sync::Arc;

pub struct ListCommand;

impl ListCommand {
    pub fn run(env: Environment, format: ListFormat) -> CliResult<()> {
        let registry = default_registry(&env.settings, Arc::new(env.source))?;
        let names = registry.names();

        match format {
            ListFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
            ListFormat::Table => {
                println!("{}", ColoredOutput::highlight("FUNCTION"));
                for name in &names {
                    println!("{}", name);
                }
                println!(
                    "{}",
                    ColoredOutput::dim(&format!("{} function(s) registered", names.len()))
                );
            }
        }
        Ok(())
    }
}

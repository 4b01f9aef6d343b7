//! Report unset configuration keys

use crate::{
    error::{CliError, CliResult},
    utils::{ColoredOutput, Environment},
};
use faas_config::missing_keys;
use faas_core::{keys, ConfigSource};
use faas_runtime::docker_host;

pub struct CheckEnvCommand;

/// Docker Engine address the built-ins will use, and whether it was set
/// explicitly rather than left at the platform default.
fn docker_endpoint(env: &Environment) -> (String, bool) {
    let configured = env.settings.endpoints.docker_host.is_some()
        || env
            .source
            .lookup(keys::DOCKER_HOST)
            .is_some_and(|v| !v.trim().is_empty());
    (docker_host(&env.settings, &env.source), configured)
}

impl CheckEnvCommand {
    pub fn run(env: &Environment, requested: Vec<String>) -> CliResult<()> {
        let full_report = requested.is_empty();
        let keys: Vec<String> = if full_report {
            keys::ALL.iter().map(|k| k.to_string()).collect()
        } else {
            requested
        };

        let missing = missing_keys(&env.source, &keys);
        for key in &keys {
            if missing.contains(key) {
                println!("{} {}", ColoredOutput::error("✗"), key);
            } else {
                println!("{} {}", ColoredOutput::success("✓"), key);
            }
        }

        // The Docker endpoint has a usable default, so it only warns
        if full_report {
            let (host, configured) = docker_endpoint(env);
            if configured {
                println!(
                    "{} {} {}",
                    ColoredOutput::success("✓"),
                    keys::DOCKER_HOST,
                    ColoredOutput::dim(&host)
                );
            } else {
                println!(
                    "{}",
                    ColoredOutput::warning(&format!("! {} unset, using {}", keys::DOCKER_HOST, host))
                );
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CliError::MissingKeys(missing))
        }
    }
}

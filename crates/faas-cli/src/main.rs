//! `faas` command line entry point

use clap::Parser;
use faas_cli::{
    cli::{Cli, Commands},
    commands::{CheckEnvCommand, ExecuteCommand, ListCommand},
    error::CliResult,
    utils::{init_tracing, load_environment, ColoredOutput},
};
use tracing::debug;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    debug!("faas v{}", env!("CARGO_PKG_VERSION"));

    let env = load_environment(cli.config.as_deref(), &cli.env_file)?;

    match cli.command {
        Commands::List { format } => ListCommand::run(env, format),

        Commands::Execute {
            name,
            input,
            input_file,
            timeout,
            pretty,
            show_metadata,
        } => {
            ExecuteCommand {
                name,
                input,
                input_file,
                timeout,
                pretty,
                show_metadata,
            }
            .run(env)
            .await
        }

        Commands::CheckEnv { keys } => CheckEnvCommand::run(&env, keys),
    }
}

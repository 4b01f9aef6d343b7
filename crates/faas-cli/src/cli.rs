//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faas", about = "Run built-in functions by name", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (YAML or JSON)
    #[arg(long, global = true, env = "FAAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// `.env` file consulted after the process environment and settings file
    #[arg(long, global = true, env = "FAAS_ENV_FILE", default_value = ".env")]
    pub env_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered functions
    List {
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// Execute a function by name
    Execute {
        /// Function name, e.g. `logger`
        name: String,

        /// JSON payload
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Payload file (JSON or YAML)
        #[arg(long)]
        input_file: Option<PathBuf>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,

        /// Include execution metadata in the output
        #[arg(long)]
        show_metadata: bool,
    },

    /// Report which configuration keys are unset
    CheckEnv {
        /// Keys to check; defaults to every credential key
        keys: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Table,
    Json,
}

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one sequential Monte Carlo simulation
    Run {
        /// Simulation config (YAML, JSON or TOML); reference system when omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Override the stream seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override the iteration cap
        #[arg(long)]
        max_iterations: Option<u64>,
        /// Output format for the results
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Run independent replications in parallel
    Replicate {
        /// Simulation config (YAML, JSON or TOML); reference system when omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Number of replications
        #[arg(short = 'n', long, default_value_t = 8)]
        replications: usize,
        /// First seed; replication i uses base_seed + i
        #[arg(long)]
        base_seed: Option<u64>,
        /// Override the iteration cap
        #[arg(long)]
        max_iterations: Option<u64>,
        /// Worker threads (`auto` = number of CPUs)
        #[arg(long, default_value = "auto")]
        threads: String,
        /// Output format for the results
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the reference configuration
    Template {
        /// Destination file; format follows the extension (stdout as YAML when omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Check a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

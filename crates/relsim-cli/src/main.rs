use std::process::ExitCode;

use clap::Parser;
use relsim_cli::cli::{Cli, Commands};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::{completions, config, replicate, run};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    let result = match &cli.command {
        Some(Commands::Run {
            config,
            seed,
            max_iterations,
            format,
        }) => run::handle(config.as_deref(), *seed, *max_iterations, *format)
            .map(|_| "Simulation finished"),
        Some(Commands::Replicate {
            config,
            replications,
            base_seed,
            max_iterations,
            threads,
            format,
        }) => replicate::handle(
            config.as_deref(),
            *replications,
            *base_seed,
            *max_iterations,
            threads,
            *format,
        )
        .map(|_| "Replications finished"),
        Some(Commands::Config { command }) => {
            config::handle(command).map(|_| "Config command successful")
        }
        Some(Commands::Completions { shell, out }) => {
            completions::handle(*shell, out.as_deref()).map(|_| "Completions generated")
        }
        None => {
            info!("No subcommand provided. Use `relsim --help` for more information.");
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(message) => {
            info!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

use std::fs;

use anyhow::{Context, Result};
use relsim_cli::cli::ConfigCommands;
use relsim_core::{load_config_from_path, render_config, SimulationConfig};
use tracing::info;

pub fn handle(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Template { out } => {
            let text = render_config(&SimulationConfig::default(), out.as_deref())?;
            match out {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(path, text)
                        .with_context(|| format!("writing config template to {}", path.display()))?;
                    println!("Wrote reference config to {}", path.display());
                }
                None => print!("{text}"),
            }
            Ok(())
        }
        ConfigCommands::Validate { path } => {
            info!("Validating simulation config {}", path.display());
            let config = load_config_from_path(path)?;
            config
                .validate()
                .with_context(|| format!("validating {}", path.display()))?;
            println!("{} is valid (seed {})", path.display(), config.seed);
            Ok(())
        }
    }
}

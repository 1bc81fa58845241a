use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use relsim_algo::{simulate, SimulationOutcome};
use relsim_cli::cli::OutputFormat;
use tabwriter::TabWriter;
use tracing::info;

use super::util::resolve_config;

pub fn handle(
    config: Option<&Path>,
    seed: Option<u64>,
    max_iterations: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let config = resolve_config(config, seed, max_iterations)?;
    info!(
        "Running sequential Monte Carlo (seed {}, cap {} iterations)",
        config.seed, config.convergence.max_iterations
    );
    let outcome = simulate(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &outcome)?;
            writeln!(out)?;
        }
        OutputFormat::Plain => write_plain(&mut out, &outcome)?,
    }
    Ok(())
}

pub fn write_plain<W: Write>(out: W, outcome: &SimulationOutcome) -> Result<()> {
    let idx = &outcome.indices;
    let cv = idx
        .coefficient_of_variation
        .map(|cv| format!("{cv:.5}"))
        .unwrap_or_else(|| "n/a".to_string());

    let mut tw = TabWriter::new(out);
    writeln!(tw, "LOLP\t{:.6}", idx.lolp)?;
    writeln!(tw, "LOLF (per year)\t{:.4}", idx.lolf_per_year)?;
    writeln!(tw, "CV\t{cv}")?;
    writeln!(tw, "Simulated years\t{:.3}", idx.elapsed_years)?;
    writeln!(tw, "Completed years\t{}", idx.completed_years)?;
    writeln!(tw, "Loss-of-load events\t{}", idx.loss_of_load_events)?;
    writeln!(tw, "Iterations\t{}", outcome.iterations)?;
    writeln!(tw, "Status\t{}", outcome.termination)?;
    tw.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relsim_core::SimulationConfig;

    #[test]
    fn test_plain_output_lists_indices() {
        let outcome = simulate(&SimulationConfig::default().with_max_iterations(500)).unwrap();
        let mut buf = Vec::new();
        write_plain(&mut buf, &outcome).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("LOLP"));
        assert!(text.contains("LOLF (per year)"));
        assert!(text.contains("did not converge within 500 iterations"));
    }
}

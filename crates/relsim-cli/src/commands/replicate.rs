use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Result};
use relsim_algo::{replication_seeds, run_replications, ReplicationSummary};
use relsim_cli::cli::OutputFormat;
use tabwriter::TabWriter;
use tracing::info;

use super::util::{configure_threads, resolve_config};

pub fn handle(
    config: Option<&Path>,
    replications: usize,
    base_seed: Option<u64>,
    max_iterations: Option<u64>,
    threads: &str,
    format: OutputFormat,
) -> Result<()> {
    if replications == 0 {
        bail!("at least one replication is required");
    }
    let config = resolve_config(config, None, max_iterations)?;
    configure_threads(threads);

    let seeds = replication_seeds(base_seed.unwrap_or(config.seed), replications);
    info!(
        "Running {} replications (seeds {}..={})",
        replications,
        seeds[0],
        seeds[seeds.len() - 1]
    );
    let summary = run_replications(&config, &seeds)?;
    info!(
        "{}/{} replications converged",
        summary.converged, replications
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &summary)?;
            writeln!(out)?;
        }
        OutputFormat::Plain => write_plain(&mut out, &summary)?,
    }
    Ok(())
}

pub fn write_plain<W: Write>(out: W, summary: &ReplicationSummary) -> Result<()> {
    let mut tw = TabWriter::new(out);
    writeln!(tw, "Seed\tLOLP\tLOLF (per year)\tYears\tStatus")?;
    for outcome in &summary.outcomes {
        let seed = outcome
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            tw,
            "{}\t{:.6}\t{:.4}\t{}\t{}",
            seed,
            outcome.indices.lolp,
            outcome.indices.lolf_per_year,
            outcome.indices.completed_years,
            if outcome.converged() { "converged" } else { "capped" }
        )?;
    }
    writeln!(
        tw,
        "mean\t{:.6}\t{:.4}\t\t{}/{} converged",
        summary.lolp.mean,
        summary.lolf_per_year.mean,
        summary.converged,
        summary.outcomes.len()
    )?;
    writeln!(
        tw,
        "std dev\t{:.6}\t{:.4}\t\t",
        summary.lolp.std_dev, summary.lolf_per_year.std_dev
    )?;
    tw.flush()?;
    Ok(())
}

use std::path::Path;

use anyhow::{Context, Result};
use rayon::ThreadPoolBuilder;
use relsim_core::{load_config_from_path, SimulationConfig};

pub fn configure_threads(threads: &str) {
    let count = if threads.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        threads.parse().unwrap_or_else(|_| num_cpus::get())
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

/// Config from `path`, or the reference system, with CLI overrides applied
/// and validated.
pub fn resolve_config(
    path: Option<&Path>,
    seed: Option<u64>,
    max_iterations: Option<u64>,
) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => load_config_from_path(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(max_iterations) = max_iterations {
        config = config.with_max_iterations(max_iterations);
    }
    config.validate().context("invalid simulation config")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_applies_overrides() {
        let cfg = resolve_config(None, Some(17), Some(1234)).unwrap();
        assert_eq!(cfg.seed, 17);
        assert_eq!(cfg.convergence.max_iterations, 1234);
    }

    #[test]
    fn test_resolve_config_rejects_zero_iterations() {
        let err = resolve_config(None, None, Some(0)).unwrap_err();
        assert!(err.to_string().contains("invalid simulation config"));
    }
}

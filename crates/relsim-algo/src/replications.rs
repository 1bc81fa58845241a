//! Independent replications across seeds.
//!
//! Replications share no state, so they run in parallel on the rayon pool;
//! each one owns its own stream seeded from its own seed.

use rayon::prelude::*;
use relsim_core::{RelsimResult, SimulationConfig};
use serde::{Deserialize, Serialize};

use crate::engine::{simulate, SimulationOutcome};

/// Mean and sample standard deviation of one index across replications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub mean: f64,
    pub std_dev: f64,
}

impl Spread {
    fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
            };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std_dev = if values.len() > 1 {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Self { mean, std_dev }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSummary {
    pub outcomes: Vec<SimulationOutcome>,
    pub lolp: Spread,
    pub lolf_per_year: Spread,
    pub converged: usize,
}

/// Consecutive seeds starting at `base_seed`.
pub fn replication_seeds(base_seed: u64, count: usize) -> Vec<u64> {
    (0..count as u64)
        .map(|i| base_seed.wrapping_add(i))
        .collect()
}

/// Run one replication per seed. Outcomes come back in seed order.
pub fn run_replications(
    config: &SimulationConfig,
    seeds: &[u64],
) -> RelsimResult<ReplicationSummary> {
    let outcomes = seeds
        .par_iter()
        .map(|&seed| simulate(&config.clone().with_seed(seed)))
        .collect::<RelsimResult<Vec<_>>>()?;

    let lolp: Vec<f64> = outcomes.iter().map(|o| o.indices.lolp).collect();
    let lolf: Vec<f64> = outcomes.iter().map(|o| o.indices.lolf_per_year).collect();
    let converged = outcomes.iter().filter(|o| o.converged()).count();

    Ok(ReplicationSummary {
        lolp: Spread::of(&lolp),
        lolf_per_year: Spread::of(&lolf),
        converged,
        outcomes,
    })
}

//! Load-served predicate for the fixed composite topology.
//!
//! ```text
//!   G1 ─┐                 ┌─ T1 ─┐
//!       ├─ remote bus ────┤      ├──── load bus ── G3
//!   G2 ─┘                 └─ T2 ─┘
//! ```
//!
//! G1 and G2 reach the load only through the transmission corridor, so their
//! contribution is capped by the transfer capacity of the lines that are up.
//! G3 sits at the load bus and is never transmission-limited.

use relsim_core::{CapacityConfig, Megawatts, GENERATOR_COUNT, LINE_COUNT};
use serde::{Deserialize, Serialize};

/// Number of leading generators behind the transmission corridor.
const REMOTE_GENERATORS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityEvaluator {
    generator_mw: Megawatts,
    line_mw: Megawatts,
}

impl CapacityEvaluator {
    pub fn new(capacity: &CapacityConfig) -> Self {
        Self {
            generator_mw: capacity.generator_mw,
            line_mw: capacity.line_mw,
        }
    }

    /// Capacity deliverable to the load bus for the given up/down states.
    pub fn available_capacity(
        &self,
        generators: &[bool; GENERATOR_COUNT],
        lines: &[bool; LINE_COUNT],
    ) -> Megawatts {
        let remote: Megawatts = generators[..REMOTE_GENERATORS]
            .iter()
            .map(|&up| if up { self.generator_mw } else { Megawatts(0.0) })
            .sum();
        let transfer: Megawatts = lines
            .iter()
            .map(|&up| if up { self.line_mw } else { Megawatts(0.0) })
            .sum();
        let direct: Megawatts = generators[REMOTE_GENERATORS..]
            .iter()
            .map(|&up| if up { self.generator_mw } else { Megawatts(0.0) })
            .sum();

        remote.min(transfer) + direct
    }

    /// Whether demand is met.
    pub fn served(
        &self,
        generators: &[bool; GENERATOR_COUNT],
        lines: &[bool; LINE_COUNT],
        demand: Megawatts,
    ) -> bool {
        self.available_capacity(generators, lines) >= demand
    }
}

impl Default for CapacityEvaluator {
    fn default() -> Self {
        Self::new(&CapacityConfig::default())
    }
}

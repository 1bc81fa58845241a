//! Deterministic daily load profile.

use serde::{Deserialize, Serialize};

use crate::error::{RelsimError, RelsimResult};
use crate::units::Megawatts;

/// Length of one load cycle in hours.
pub const CYCLE_HOURS: f64 = 24.0;

/// One point of the daily load curve: `demand` holds from `start_hour` until
/// the next point's start hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadStep {
    pub start_hour: f64,
    pub demand_mw: Megawatts,
}

impl LoadStep {
    pub fn new(start_hour: f64, demand_mw: f64) -> Self {
        Self {
            start_hour,
            demand_mw: Megawatts(demand_mw),
        }
    }
}

/// Reference daily curve: off-peak overnight, peak from 08:00 to 12:00.
pub fn reference_load_steps() -> Vec<LoadStep> {
    vec![
        LoadStep::new(0.0, 60.0),
        LoadStep::new(4.0, 105.0),
        LoadStep::new(8.0, 205.0),
        LoadStep::new(12.0, 105.0),
        LoadStep::new(16.0, 60.0),
    ]
}

/// Cyclic, non-random demand entity.
///
/// Unlike [`crate::entity::TwoStateEntity`], `decay` does not clamp: the
/// load's ttc may dip below zero. In practice it is always overwritten by
/// `advance` before that matters, and the asymmetry is kept as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProfile {
    steps: Vec<LoadStep>,
    index: usize,
    ttc: f64,
}

impl LoadProfile {
    /// Start at the first step with ttc set to the gap to the second.
    pub fn new(steps: Vec<LoadStep>) -> RelsimResult<Self> {
        if steps.is_empty() {
            return Err(RelsimError::Config("load profile has no steps".into()));
        }
        let mut profile = Self {
            steps,
            index: 0,
            ttc: 0.0,
        };
        profile.ttc = profile.gap_to_next();
        Ok(profile)
    }

    pub fn reference() -> Self {
        Self {
            ttc: 4.0,
            steps: reference_load_steps(),
            index: 0,
        }
    }

    /// Rebuild from captured parts, e.g. a snapshot.
    pub fn from_parts(steps: Vec<LoadStep>, index: usize, ttc: f64) -> RelsimResult<Self> {
        if index >= steps.len() {
            return Err(RelsimError::Snapshot(format!(
                "load index {index} out of range for {} steps",
                steps.len()
            )));
        }
        Ok(Self { steps, index, ttc })
    }

    pub fn name(&self) -> &str {
        "Load"
    }

    pub fn steps(&self) -> &[LoadStep] {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Hours until the next step begins.
    pub fn ttc(&self) -> f64 {
        self.ttc
    }

    pub fn current_demand(&self) -> Megawatts {
        self.steps[self.index].demand_mw
    }

    /// Move to the next step (wrapping) and reset ttc to its dwell time.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.steps.len();
        self.ttc = self.gap_to_next();
    }

    /// Consume `delta` hours. Not clamped.
    pub fn decay(&mut self, delta: f64) {
        self.ttc -= delta;
    }

    fn gap_to_next(&self) -> f64 {
        let start = self.steps[self.index].start_hour;
        match self.steps.get(self.index + 1) {
            Some(next) => next.start_hour - start,
            None => CYCLE_HOURS - start,
        }
    }
}

//! Simulation clock, per-year accumulators and the CV stopping rule.
//!
//! Years are closed lazily: the clock is checked *before* the current
//! event's delta is added, and once it has passed the yearly threshold the
//! year is closed and the clock reset to zero. The delta of the closing step
//! is dropped rather than rolled into the next year, and the overshoot
//! beyond the threshold stays in the closed year. Both are part of the
//! estimator and are kept as is.
//!
//! The convergence statistic is
//!
//! ```text
//! CV = pstdev(running averages of yearly unserved hours)
//!      / mean(yearly unserved hours)
//! ```
//!
//! The numerator and denominator come from different series.

use relsim_core::ConvergenceConfig;
use serde::{Deserialize, Serialize};

/// Outcome of closing one simulated year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    /// 1-based index of the year just closed.
    pub year: usize,
    pub unserved_hours: f64,
    pub running_average: f64,
    /// `None` while no loss of load has been observed in any year.
    pub coefficient_of_variation: Option<f64>,
    pub converged: bool,
}

/// Final statistics of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityIndices {
    /// Loss-of-load probability: unserved hours over elapsed hours.
    pub lolp: f64,
    /// Loss-of-load frequency: onsets per elapsed year.
    pub lolf_per_year: f64,
    pub coefficient_of_variation: Option<f64>,
    pub elapsed_years: f64,
    pub completed_years: usize,
    pub loss_of_load_events: u64,
    pub unserved_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceTracker {
    criteria: ConvergenceConfig,
    clock: f64,
    elapsed_hours: f64,
    year_unserved: f64,
    yearly_unserved: Vec<f64>,
    running_averages: Vec<f64>,
    cv_history: Vec<Option<f64>>,
    onsets: u64,
    last_served: bool,
}

impl ConvergenceTracker {
    pub fn new(criteria: ConvergenceConfig) -> Self {
        Self {
            criteria,
            clock: 0.0,
            elapsed_hours: 0.0,
            year_unserved: 0.0,
            yearly_unserved: Vec::new(),
            running_averages: Vec::new(),
            cv_history: Vec::new(),
            onsets: 0,
            last_served: true,
        }
    }

    pub fn criteria(&self) -> &ConvergenceConfig {
        &self.criteria
    }

    /// Account for an interval of `delta` hours spent in the given served
    /// status. A served-to-unserved change counts as one loss-of-load onset.
    pub fn record_interval(&mut self, delta: f64, served: bool) {
        if !served {
            self.year_unserved += delta;
            if self.last_served {
                self.onsets += 1;
            }
        }
        self.last_served = served;
    }

    /// Move the intra-year clock forward, closing the year first if the
    /// clock has already passed the threshold.
    pub fn advance(&mut self, delta: f64) -> Option<YearSummary> {
        if self.clock > self.criteria.hours_per_year {
            Some(self.close_year())
        } else {
            self.clock += delta;
            None
        }
    }

    fn close_year(&mut self) -> YearSummary {
        self.elapsed_hours += self.clock;
        self.clock = 0.0;

        let unserved_hours = self.year_unserved;
        self.yearly_unserved.push(unserved_hours);
        self.year_unserved = 0.0;

        let running_average = mean(&self.yearly_unserved);
        self.running_averages.push(running_average);

        let cv = coefficient_of_variation(&self.running_averages, &self.yearly_unserved);
        self.cv_history.push(cv);

        let year = self.yearly_unserved.len();
        let converged =
            year > self.criteria.min_years && cv.is_some_and(|cv| cv <= self.criteria.cv_threshold);

        YearSummary {
            year,
            unserved_hours,
            running_average,
            coefficient_of_variation: cv,
            converged,
        }
    }

    /// Hours elapsed in the current, still open year.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Hours covered by all closed years.
    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_hours
    }

    pub fn completed_years(&self) -> usize {
        self.yearly_unserved.len()
    }

    pub fn yearly_unserved(&self) -> &[f64] {
        &self.yearly_unserved
    }

    pub fn running_averages(&self) -> &[f64] {
        &self.running_averages
    }

    pub fn cv_history(&self) -> &[Option<f64>] {
        &self.cv_history
    }

    pub fn current_cv(&self) -> Option<f64> {
        self.cv_history.last().copied().flatten()
    }

    pub fn loss_of_load_events(&self) -> u64 {
        self.onsets
    }

    /// Unserved hours accumulated in the open year.
    pub fn current_year_unserved(&self) -> f64 {
        self.year_unserved
    }

    /// Indices over closed years. All zero until the first year closes.
    pub fn indices(&self) -> ReliabilityIndices {
        let unserved_hours: f64 = self.yearly_unserved.iter().sum();
        let elapsed_years = self.elapsed_hours / self.criteria.hours_per_year;
        let (lolp, lolf_per_year) = if self.elapsed_hours > 0.0 {
            (
                unserved_hours / self.elapsed_hours,
                self.onsets as f64 / elapsed_years,
            )
        } else {
            (0.0, 0.0)
        };
        ReliabilityIndices {
            lolp,
            lolf_per_year,
            coefficient_of_variation: self.current_cv(),
            elapsed_years,
            completed_years: self.completed_years(),
            loss_of_load_events: self.onsets,
            unserved_hours,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn pstdev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

fn coefficient_of_variation(running_averages: &[f64], yearly: &[f64]) -> Option<f64> {
    let denom = mean(yearly);
    if denom == 0.0 {
        return None;
    }
    let cv = pstdev(running_averages) / denom;
    cv.is_finite().then_some(cv)
}

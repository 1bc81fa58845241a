//! Sequential (next-event) Monte Carlo engine.
//!
//! Each iteration:
//!
//! 1. synchronise the lines to the current weather (resamples only after a
//!    weather transition),
//! 2. pick the entity with the smallest ttc; `delta` is that ttc,
//! 3. charge `delta` to the unserved accumulator if the system was in loss
//!    of load, counting an onset on a served-to-unserved change,
//! 4. fire the selected entity's transition,
//! 5. advance the clock (closing the year and testing convergence when the
//!    clock has passed the yearly threshold),
//! 6. decay every other entity by `delta`,
//! 7. re-evaluate whether load is served.
//!
//! Within one replication the loop is strictly sequential: every event
//! depends on the ttc values left by the previous one.

use relsim_core::{
    ConvergenceConfig, RandomStream, RelsimError, RelsimResult, SimulationConfig, UniformSource,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::capacity::CapacityEvaluator;
use crate::convergence::{ConvergenceTracker, ReliabilityIndices, YearSummary};
use crate::system::{CompositeSystem, EntityKey};

/// What happened in one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub iteration: u64,
    pub entity: EntityKey,
    pub delta: f64,
    /// Served status after the event.
    pub served: bool,
    /// Lines resampled because the weather changed since the last iteration.
    pub weather_resamples: usize,
    pub year: Option<YearSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Termination {
    /// CV reached the threshold after the minimum number of years.
    Converged { year: usize },
    /// The iteration cap was hit first.
    IterationCap { iterations: u64 },
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Converged { year } => write!(f, "converged after {year} years"),
            Termination::IterationCap { iterations } => {
                write!(f, "did not converge within {iterations} iterations")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub seed: Option<u64>,
    pub termination: Termination,
    pub indices: ReliabilityIndices,
    pub iterations: u64,
    pub cv_history: Vec<Option<f64>>,
}

impl SimulationOutcome {
    pub fn converged(&self) -> bool {
        matches!(self.termination, Termination::Converged { .. })
    }
}

/// Resumable engine state (everything except the stream and evaluator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub system: CompositeSystem,
    pub tracker: ConvergenceTracker,
    pub served: bool,
    pub iterations: u64,
}

pub struct SequentialMonteCarlo<S> {
    system: CompositeSystem,
    evaluator: CapacityEvaluator,
    tracker: ConvergenceTracker,
    stream: S,
    served: bool,
    iterations: u64,
    seed: Option<u64>,
}

impl SequentialMonteCarlo<RandomStream> {
    /// Engine over a fresh stream seeded from `config.seed`.
    pub fn from_config(config: &SimulationConfig) -> RelsimResult<Self> {
        let mut engine = Self::with_stream(config, RandomStream::from_seed(config.seed))?;
        engine.seed = Some(config.seed);
        Ok(engine)
    }
}

impl<S: UniformSource> SequentialMonteCarlo<S> {
    /// Engine over a caller-supplied stream. Construction consumes the six
    /// initial draws.
    pub fn with_stream(config: &SimulationConfig, mut stream: S) -> RelsimResult<Self> {
        let system = CompositeSystem::from_config(config, &mut stream)?;
        Ok(Self::from_parts(
            system,
            CapacityEvaluator::new(&config.capacity),
            config.convergence,
            stream,
        ))
    }

    /// Engine over an explicitly assembled system. Load starts as served.
    pub fn from_parts(
        system: CompositeSystem,
        evaluator: CapacityEvaluator,
        criteria: ConvergenceConfig,
        stream: S,
    ) -> Self {
        Self {
            system,
            evaluator,
            tracker: ConvergenceTracker::new(criteria),
            stream,
            served: true,
            iterations: 0,
            seed: None,
        }
    }

    /// Resume from a captured state.
    pub fn restore(state: EngineState, evaluator: CapacityEvaluator, stream: S) -> Self {
        Self {
            system: state.system,
            evaluator,
            tracker: state.tracker,
            stream,
            served: state.served,
            iterations: state.iterations,
            seed: None,
        }
    }

    pub fn snapshot(&self) -> EngineState {
        EngineState {
            system: self.system.clone(),
            tracker: self.tracker.clone(),
            served: self.served,
            iterations: self.iterations,
        }
    }

    pub fn system(&self) -> &CompositeSystem {
        &self.system
    }

    pub fn tracker(&self) -> &ConvergenceTracker {
        &self.tracker
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn is_served(&self) -> bool {
        self.served
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Process exactly one event.
    pub fn step(&mut self) -> RelsimResult<StepReport> {
        let weather_resamples = self.system.sync_lines_to_weather(&mut self.stream);

        let (entity, delta) = self.system.next_event();
        if delta.is_nan() || delta < 0.0 {
            return Err(RelsimError::NegativeSojourn {
                entity: entity.to_string(),
                ttc: delta,
            });
        }

        self.tracker.record_interval(delta, self.served);
        self.system.apply_event(entity, &mut self.stream);
        let year = self.tracker.advance(delta);
        self.system.decay_all_except(entity, delta);

        self.served = self.evaluator.served(
            &self.system.generator_states(),
            &self.system.line_states(),
            self.system.demand(),
        );
        self.iterations += 1;

        Ok(StepReport {
            iteration: self.iterations,
            entity,
            delta,
            served: self.served,
            weather_resamples,
            year,
        })
    }

    /// Step until convergence or the iteration cap.
    pub fn run(&mut self) -> RelsimResult<SimulationOutcome> {
        let max_iterations = self.tracker.criteria().max_iterations;
        while self.iterations < max_iterations {
            let report = self.step()?;
            let Some(year) = report.year else {
                continue;
            };
            debug!(
                year = year.year,
                unserved_hours = year.unserved_hours,
                running_average = year.running_average,
                cv = ?year.coefficient_of_variation,
                "closed simulated year"
            );
            if year.converged {
                info!(
                    years = year.year,
                    iterations = self.iterations,
                    cv = ?year.coefficient_of_variation,
                    "convergence criterion met"
                );
                return Ok(self.outcome(Termination::Converged { year: year.year }));
            }
        }

        warn!(
            iterations = self.iterations,
            years = self.tracker.completed_years(),
            cv = ?self.tracker.current_cv(),
            "iteration cap reached before convergence"
        );
        Ok(self.outcome(Termination::IterationCap {
            iterations: self.iterations,
        }))
    }

    fn outcome(&self, termination: Termination) -> SimulationOutcome {
        SimulationOutcome {
            seed: self.seed,
            termination,
            indices: self.tracker.indices(),
            iterations: self.iterations,
            cv_history: self.tracker.cv_history().to_vec(),
        }
    }
}

/// Run the configured system once from `config.seed`.
pub fn simulate(config: &SimulationConfig) -> RelsimResult<SimulationOutcome> {
    SequentialMonteCarlo::from_config(config)?.run()
}

//! # relsim-algo: Sequential Monte Carlo Reliability Evaluation
//!
//! Estimates loss-of-load probability (LOLP) and loss-of-load frequency
//! (LOLF) of a small composite system by next-event simulation: the entity
//! with the smallest time-to-change fires, time jumps by that amount, and
//! the capacity check is re-run after every event.
//!
//! - [`CapacityEvaluator`]: load-served predicate for the fixed topology
//! - [`ConvergenceTracker`]: yearly accumulators and the CV stopping rule
//! - [`CompositeSystem`]: the seven entities and next-event selection
//! - [`SequentialMonteCarlo`]: the event loop
//! - [`run_replications`]: independent seeds in parallel
//!
//! ## Example
//!
//! ```no_run
//! use relsim_algo::simulate;
//! use relsim_core::SimulationConfig;
//!
//! let outcome = simulate(&SimulationConfig::default())?;
//! println!("LOLP = {:.5}", outcome.indices.lolp);
//! println!("LOLF = {:.3} /yr", outcome.indices.lolf_per_year);
//! # Ok::<(), relsim_core::RelsimError>(())
//! ```

pub mod capacity;
pub mod convergence;
pub mod engine;
pub mod replications;
pub mod system;

pub use capacity::CapacityEvaluator;
pub use convergence::{ConvergenceTracker, ReliabilityIndices, YearSummary};
pub use engine::{
    simulate, EngineState, SequentialMonteCarlo, SimulationOutcome, StepReport, Termination,
};
pub use replications::{replication_seeds, run_replications, ReplicationSummary, Spread};
pub use system::{CompositeSystem, EntityKey, EVENT_ORDER};

//! # relsim-core: Building Blocks for Sequential Reliability Simulation
//!
//! Provides the stochastic and deterministic entities of a small composite
//! power system, the shared pseudorandom stream that drives them, and the
//! configuration describing the reference system.
//!
//! ## Entities
//!
//! | Type | Behaviour |
//! |------|-----------|
//! | [`Generator`] | two-state, constant failure and repair rate |
//! | [`WeatherProcess`] | two-state, up = normal weather |
//! | [`TransmissionLine`] | two-state, failure rate follows the weather |
//! | [`LoadProfile`] | deterministic daily demand cycle |
//!
//! Two-state entities hold a time-to-change (ttc) sampled from an
//! exponential law. All sampling goes through a [`UniformSource`] handle so
//! the draw order is explicit at every call site.
//!
//! ## Example
//!
//! ```
//! use relsim_core::{AnnualRate, Generator, RandomStream};
//!
//! let mut stream = RandomStream::from_seed(4);
//! let mut g1 = Generator::with_annual_rates("G1", AnnualRate(36.5), AnnualRate(1095.0), &mut stream);
//! assert!(g1.is_up());
//! g1.flip_and_resample(&mut stream);
//! assert!(!g1.is_up());
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod load;
pub mod stream;
pub mod units;

pub use config::{
    load_config_from_path, render_config, CapacityConfig, ConvergenceConfig, LineRates,
    SimulationConfig, TwoStateRates, GENERATOR_COUNT, LINE_COUNT,
};
pub use entity::{
    time_to_change, ConstantRate, Generator, RateModel, TransmissionLine, TwoStateEntity,
    Weather, WeatherProcess, WeatherRates,
};
pub use error::{RelsimError, RelsimResult};
pub use load::{reference_load_steps, LoadProfile, LoadStep};
pub use stream::{RandomStream, ScriptedDraws, UniformSource, DEFAULT_SEED};
pub use units::{AnnualRate, Megawatts, HOURS_PER_YEAR};

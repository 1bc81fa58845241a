//! Two-state stochastic entities.
//!
//! A [`TwoStateEntity`] is either up or down and carries the remaining
//! sojourn time (ttc, hours) until its next transition. Sojourn times are
//! exponential: `ttc = -ln(u) / rate` with `u` drawn from the shared stream,
//! using the failure rate while up and the repair rate while down.
//!
//! The failure rate is supplied by a [`RateModel`] capability object rather
//! than by subclassing. Generators and the weather process use a
//! [`ConstantRate`]; transmission lines use [`WeatherRates`], which selects
//! between a normal- and an adverse-weather rate according to the weather
//! regime the line was last synchronised to.
//!
//! Weather synchronisation is explicit: the engine calls
//! [`TransmissionLine::sync_to_weather`] once per iteration before reading
//! any ttc. Reading a ttc never mutates anything.

use serde::{Deserialize, Serialize};

use crate::stream::UniformSource;
use crate::units::AnnualRate;

/// Exponential sojourn time for draw `u` in (0, 1) and a rate in events per
/// hour.
///
/// A zero rate yields `+inf`, i.e. the entity never transitions.
#[inline]
pub fn time_to_change(u: f64, rate: f64) -> f64 {
    -u.ln() / rate
}

/// Supplies an entity's current failure rate (events per hour).
pub trait RateModel {
    fn failure_rate(&self) -> f64;
}

/// Failure rate that never changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantRate {
    pub failure_rate: f64,
}

impl ConstantRate {
    pub fn per_year(rate: AnnualRate) -> Self {
        Self {
            failure_rate: rate.per_hour(),
        }
    }
}

impl RateModel for ConstantRate {
    fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

/// Binary weather regime. The weather process being up means normal weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Normal,
    Adverse,
}

impl Weather {
    pub fn from_state(up: bool) -> Self {
        if up {
            Weather::Normal
        } else {
            Weather::Adverse
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weather::Normal => write!(f, "normal"),
            Weather::Adverse => write!(f, "adverse"),
        }
    }
}

/// Weather-dependent failure rate.
///
/// `regime` is the weather the current ttc was sampled under; it only moves
/// through [`TransmissionLine::sync_to_weather`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherRates {
    pub normal: f64,
    pub adverse: f64,
    pub regime: Weather,
}

impl WeatherRates {
    pub fn per_year(normal: AnnualRate, adverse: AnnualRate, regime: Weather) -> Self {
        Self {
            normal: normal.per_hour(),
            adverse: adverse.per_hour(),
            regime,
        }
    }
}

impl RateModel for WeatherRates {
    fn failure_rate(&self) -> f64 {
        match self.regime {
            Weather::Normal => self.normal,
            Weather::Adverse => self.adverse,
        }
    }
}

/// A component that alternates between up and down with exponential
/// sojourn times.
///
/// Serialising captures (state, ttc, rates) completely; restoring with
/// [`TwoStateEntity::from_parts`] and feeding the same remaining draws
/// reproduces the same transitions. Infinite ttc values (zero rates) do not
/// survive JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoStateEntity<M> {
    name: String,
    model: M,
    repair_rate: f64,
    state: bool,
    ttc: f64,
}

/// Generators and the weather process have constant failure rates.
pub type Generator = TwoStateEntity<ConstantRate>;
pub type WeatherProcess = TwoStateEntity<ConstantRate>;
/// Transmission lines fail faster in adverse weather.
pub type TransmissionLine = TwoStateEntity<WeatherRates>;

impl<M: RateModel> TwoStateEntity<M> {
    /// Create an entity in the up state and sample its first ttc.
    ///
    /// `repair_rate` is in events per hour.
    pub fn new<S: UniformSource + ?Sized>(
        name: impl Into<String>,
        model: M,
        repair_rate: f64,
        stream: &mut S,
    ) -> Self {
        let mut entity = Self {
            name: name.into(),
            model,
            repair_rate,
            state: true,
            ttc: 0.0,
        };
        entity.ttc = entity.sample_ttc(stream);
        entity
    }

    /// Rebuild an entity from previously captured parts without drawing.
    pub fn from_parts(
        name: impl Into<String>,
        model: M,
        repair_rate: f64,
        state: bool,
        ttc: f64,
    ) -> Self {
        Self {
            name: name.into(),
            model,
            repair_rate,
            state,
            ttc,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_up(&self) -> bool {
        self.state
    }

    /// Remaining hours until the next transition.
    pub fn ttc(&self) -> f64 {
        self.ttc
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn repair_rate(&self) -> f64 {
        self.repair_rate
    }

    pub fn failure_rate(&self) -> f64 {
        self.model.failure_rate()
    }

    /// Rate governing the current sojourn.
    pub fn current_rate(&self) -> f64 {
        if self.state {
            self.model.failure_rate()
        } else {
            self.repair_rate
        }
    }

    /// Draw one sojourn time for the current state. Consumes exactly one draw.
    pub fn sample_ttc<S: UniformSource + ?Sized>(&self, stream: &mut S) -> f64 {
        time_to_change(stream.next_uniform(), self.current_rate())
    }

    /// Invert the state and resample ttc with the new state's rate.
    pub fn flip_and_resample<S: UniformSource + ?Sized>(&mut self, stream: &mut S) {
        self.state = !self.state;
        self.ttc = self.sample_ttc(stream);
    }

    /// Consume `delta` hours of the remaining sojourn, clamped at zero.
    pub fn decay(&mut self, delta: f64) {
        self.ttc = (self.ttc - delta).max(0.0);
    }
}

impl Generator {
    /// Constant-rate entity from per-year failure and repair rates.
    pub fn with_annual_rates<S: UniformSource + ?Sized>(
        name: impl Into<String>,
        failure_rate: AnnualRate,
        repair_rate: AnnualRate,
        stream: &mut S,
    ) -> Self {
        Self::new(
            name,
            ConstantRate::per_year(failure_rate),
            repair_rate.per_hour(),
            stream,
        )
    }

    /// Weather regime implied by this entity's state when it is the weather
    /// process.
    pub fn weather(&self) -> Weather {
        Weather::from_state(self.state)
    }
}

impl TransmissionLine {
    /// Line whose failure rate follows the weather, sampled under `weather`.
    pub fn weather_modulated<S: UniformSource + ?Sized>(
        name: impl Into<String>,
        normal_failure_rate: AnnualRate,
        adverse_failure_rate: AnnualRate,
        repair_rate: AnnualRate,
        weather: Weather,
        stream: &mut S,
    ) -> Self {
        Self::new(
            name,
            WeatherRates::per_year(normal_failure_rate, adverse_failure_rate, weather),
            repair_rate.per_hour(),
            stream,
        )
    }

    /// Weather regime the current ttc was sampled under.
    pub fn regime(&self) -> Weather {
        self.model.regime
    }

    /// Bring the line in line with the current weather.
    ///
    /// When the weather differs from the cached regime the remaining sojourn
    /// is discarded and resampled with the new effective rate (memoryless
    /// exponential), and the regime is updated. Returns whether a resample
    /// happened; repeated calls under unchanged weather are no-ops.
    pub fn sync_to_weather<S: UniformSource + ?Sized>(
        &mut self,
        weather: Weather,
        stream: &mut S,
    ) -> bool {
        if self.model.regime == weather {
            return false;
        }
        self.model.regime = weather;
        self.ttc = self.sample_ttc(stream);
        true
    }
}

//! The fixed composite system: three generators, one weather process, two
//! weather-modulated lines and one load.

use relsim_core::{
    Generator, LoadProfile, Megawatts, RelsimError, RelsimResult, SimulationConfig,
    TransmissionLine, UniformSource, Weather, WeatherProcess, GENERATOR_COUNT, LINE_COUNT,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one entity of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKey {
    Generator(usize),
    Weather,
    Line(usize),
    Load,
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Generator(i) => write!(f, "G{}", i + 1),
            EntityKey::Weather => write!(f, "Weather"),
            EntityKey::Line(i) => write!(f, "T{}", i + 1),
            EntityKey::Load => write!(f, "Load"),
        }
    }
}

/// Scan order for next-event selection; ties go to the earliest entry.
pub const EVENT_ORDER: [EntityKey; GENERATOR_COUNT + 1 + LINE_COUNT + 1] = [
    EntityKey::Generator(0),
    EntityKey::Generator(1),
    EntityKey::Generator(2),
    EntityKey::Weather,
    EntityKey::Line(0),
    EntityKey::Line(1),
    EntityKey::Load,
];

/// All entities of one replication.
///
/// Serialising a system captures every entity's state, ttc and rates; with
/// the same remaining draws a restored system selects the same events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSystem {
    generators: [Generator; GENERATOR_COUNT],
    weather: WeatherProcess,
    lines: [TransmissionLine; LINE_COUNT],
    load: LoadProfile,
}

impl CompositeSystem {
    /// Build every entity from `config`, drawing initial sojourn times in
    /// the order G1, G2, G3, Weather, T1, T2.
    pub fn from_config<S: UniformSource + ?Sized>(
        config: &SimulationConfig,
        stream: &mut S,
    ) -> RelsimResult<Self> {
        config
            .validate()
            .map_err(|err| RelsimError::Config(err.to_string()))?;

        let generators = std::array::from_fn(|i| {
            let rates = &config.generators[i];
            Generator::with_annual_rates(
                format!("G{}", i + 1),
                rates.failure_per_year,
                rates.repair_per_year,
                &mut *stream,
            )
        });
        let weather = WeatherProcess::with_annual_rates(
            "Weather",
            config.weather.failure_per_year,
            config.weather.repair_per_year,
            stream,
        );
        let regime = weather.weather();
        let lines = std::array::from_fn(|i| {
            let rates = &config.lines[i];
            TransmissionLine::weather_modulated(
                format!("T{}", i + 1),
                rates.normal_failure_per_year,
                rates.adverse_failure_per_year,
                rates.repair_per_year,
                regime,
                &mut *stream,
            )
        });
        let load = LoadProfile::new(config.load_profile.clone())?;

        Ok(Self {
            generators,
            weather,
            lines,
            load,
        })
    }

    /// Assemble a system from explicit entities, e.g. to hold components in
    /// a fixed state.
    pub fn from_parts(
        generators: [Generator; GENERATOR_COUNT],
        weather: WeatherProcess,
        lines: [TransmissionLine; LINE_COUNT],
        load: LoadProfile,
    ) -> Self {
        Self {
            generators,
            weather,
            lines,
            load,
        }
    }

    pub fn generators(&self) -> &[Generator; GENERATOR_COUNT] {
        &self.generators
    }

    pub fn weather_process(&self) -> &WeatherProcess {
        &self.weather
    }

    pub fn lines(&self) -> &[TransmissionLine; LINE_COUNT] {
        &self.lines
    }

    pub fn load(&self) -> &LoadProfile {
        &self.load
    }

    pub fn weather(&self) -> Weather {
        self.weather.weather()
    }

    pub fn generator_states(&self) -> [bool; GENERATOR_COUNT] {
        std::array::from_fn(|i| self.generators[i].is_up())
    }

    pub fn line_states(&self) -> [bool; LINE_COUNT] {
        std::array::from_fn(|i| self.lines[i].is_up())
    }

    pub fn demand(&self) -> Megawatts {
        self.load.current_demand()
    }

    pub fn ttc(&self, key: EntityKey) -> f64 {
        match key {
            EntityKey::Generator(i) => self.generators[i].ttc(),
            EntityKey::Weather => self.weather.ttc(),
            EntityKey::Line(i) => self.lines[i].ttc(),
            EntityKey::Load => self.load.ttc(),
        }
    }

    /// Resample every line whose cached regime differs from the current
    /// weather. Returns the number of lines resampled.
    pub fn sync_lines_to_weather<S: UniformSource + ?Sized>(&mut self, stream: &mut S) -> usize {
        let weather = self.weather.weather();
        self.lines
            .iter_mut()
            .map(|line| line.sync_to_weather(weather, &mut *stream))
            .filter(|&resampled| resampled)
            .count()
    }

    /// Entity with the smallest ttc and that ttc.
    pub fn next_event(&self) -> (EntityKey, f64) {
        let mut best = (EVENT_ORDER[0], self.ttc(EVENT_ORDER[0]));
        for key in &EVENT_ORDER[1..] {
            let ttc = self.ttc(*key);
            if ttc < best.1 {
                best = (*key, ttc);
            }
        }
        best
    }

    /// Fire the transition of `key`.
    pub fn apply_event<S: UniformSource + ?Sized>(&mut self, key: EntityKey, stream: &mut S) {
        match key {
            EntityKey::Generator(i) => self.generators[i].flip_and_resample(stream),
            EntityKey::Weather => self.weather.flip_and_resample(stream),
            EntityKey::Line(i) => self.lines[i].flip_and_resample(stream),
            EntityKey::Load => self.load.advance(),
        }
    }

    /// Age every entity except `fired` by `delta` hours.
    pub fn decay_all_except(&mut self, fired: EntityKey, delta: f64) {
        for (i, g) in self.generators.iter_mut().enumerate() {
            if fired != EntityKey::Generator(i) {
                g.decay(delta);
            }
        }
        if fired != EntityKey::Weather {
            self.weather.decay(delta);
        }
        for (i, l) in self.lines.iter_mut().enumerate() {
            if fired != EntityKey::Line(i) {
                l.decay(delta);
            }
        }
        if fired != EntityKey::Load {
            self.load.decay(delta);
        }
    }
}

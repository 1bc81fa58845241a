//! Simulation configuration.
//!
//! Every field defaults to the reference three-generator, two-line system,
//! so an empty file (or no file at all) runs the reference case. Files are
//! read as YAML, JSON or TOML depending on extension.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::load::{reference_load_steps, LoadStep, CYCLE_HOURS};
use crate::stream::DEFAULT_SEED;
use crate::units::{AnnualRate, Megawatts, HOURS_PER_YEAR};

/// Generators in the fixed topology. The first two feed the load through
/// the transmission corridor, the last one is connected directly.
pub const GENERATOR_COUNT: usize = 3;
/// Parallel transmission lines in the corridor.
pub const LINE_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_generators")]
    pub generators: Vec<TwoStateRates>,
    #[serde(default = "default_weather")]
    pub weather: TwoStateRates,
    #[serde(default = "default_lines")]
    pub lines: Vec<LineRates>,
    #[serde(default)]
    pub capacity: CapacityConfig,
    #[serde(default = "reference_load_steps")]
    pub load_profile: Vec<LoadStep>,
    #[serde(default)]
    pub convergence: ConvergenceConfig,
}

/// Per-year transition rates of a constant-rate two-state component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoStateRates {
    pub failure_per_year: AnnualRate,
    pub repair_per_year: AnnualRate,
}

/// Per-year rates of a weather-modulated transmission line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineRates {
    pub normal_failure_per_year: AnnualRate,
    pub adverse_failure_per_year: AnnualRate,
    pub repair_per_year: AnnualRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Output of each generator when up.
    #[serde(default = "default_generator_mw")]
    pub generator_mw: Megawatts,
    /// Transfer capacity of each line when up.
    #[serde(default = "default_line_mw")]
    pub line_mw: Megawatts,
}

/// Stopping rule and run bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// Convergence is only accepted once strictly more years than this have
    /// completed.
    #[serde(default = "default_min_years")]
    pub min_years: usize,
    #[serde(default = "default_cv_threshold")]
    pub cv_threshold: f64,
    #[serde(default = "default_hours_per_year")]
    pub hours_per_year: f64,
    /// Hard bound on loop iterations; hitting it ends the run unconverged.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_generators() -> Vec<TwoStateRates> {
    vec![
        TwoStateRates {
            failure_per_year: AnnualRate(36.5),
            repair_per_year: AnnualRate(1095.0),
        };
        GENERATOR_COUNT
    ]
}

fn default_weather() -> TwoStateRates {
    TwoStateRates {
        failure_per_year: AnnualRate(43.8),
        repair_per_year: AnnualRate(438.0),
    }
}

fn default_lines() -> Vec<LineRates> {
    vec![
        LineRates {
            normal_failure_per_year: AnnualRate(10.0),
            adverse_failure_per_year: AnnualRate(100.0),
            repair_per_year: AnnualRate(1095.0),
        };
        LINE_COUNT
    ]
}

fn default_generator_mw() -> Megawatts {
    Megawatts(75.0)
}

fn default_line_mw() -> Megawatts {
    Megawatts(100.0)
}

fn default_min_years() -> usize {
    50
}

fn default_cv_threshold() -> f64 {
    0.05
}

fn default_hours_per_year() -> f64 {
    HOURS_PER_YEAR
}

fn default_max_iterations() -> u64 {
    999_999
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            generator_mw: default_generator_mw(),
            line_mw: default_line_mw(),
        }
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            min_years: default_min_years(),
            cv_threshold: default_cv_threshold(),
            hours_per_year: default_hours_per_year(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            generators: default_generators(),
            weather: default_weather(),
            lines: default_lines(),
            capacity: CapacityConfig::default(),
            load_profile: reference_load_steps(),
            convergence: ConvergenceConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Builder: Set the stream seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder: Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.convergence.max_iterations = max_iterations;
        self
    }

    /// Builder: Replace the daily load curve
    pub fn with_load_profile(mut self, steps: Vec<LoadStep>) -> Self {
        self.load_profile = steps;
        self
    }

    /// Builder: Replace the convergence rule
    pub fn with_convergence(mut self, convergence: ConvergenceConfig) -> Self {
        self.convergence = convergence;
        self
    }

    /// Check topology sizes, rates, the load table and the stopping rule.
    pub fn validate(&self) -> Result<()> {
        if self.generators.len() != GENERATOR_COUNT {
            return Err(anyhow!(
                "expected {GENERATOR_COUNT} generators, found {}",
                self.generators.len()
            ));
        }
        if self.lines.len() != LINE_COUNT {
            return Err(anyhow!(
                "expected {LINE_COUNT} transmission lines, found {}",
                self.lines.len()
            ));
        }
        for (i, g) in self.generators.iter().enumerate() {
            check_rate(&format!("generator {} failure", i + 1), g.failure_per_year)?;
            check_rate(&format!("generator {} repair", i + 1), g.repair_per_year)?;
        }
        check_rate("weather failure", self.weather.failure_per_year)?;
        check_rate("weather repair", self.weather.repair_per_year)?;
        for (i, l) in self.lines.iter().enumerate() {
            check_rate(
                &format!("line {} normal-weather failure", i + 1),
                l.normal_failure_per_year,
            )?;
            check_rate(
                &format!("line {} adverse-weather failure", i + 1),
                l.adverse_failure_per_year,
            )?;
            check_rate(&format!("line {} repair", i + 1), l.repair_per_year)?;
        }
        for (label, mw) in [
            ("generator capacity", self.capacity.generator_mw),
            ("line capacity", self.capacity.line_mw),
        ] {
            if !mw.is_finite() || mw.value() < 0.0 {
                return Err(anyhow!("{label} must be finite and >= 0, got {mw}"));
            }
        }
        self.validate_load_profile()?;

        let c = &self.convergence;
        if !(c.cv_threshold.is_finite() && c.cv_threshold > 0.0) {
            return Err(anyhow!("cv_threshold must be > 0"));
        }
        if !(c.hours_per_year.is_finite() && c.hours_per_year > 0.0) {
            return Err(anyhow!("hours_per_year must be > 0"));
        }
        if c.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be > 0"));
        }
        Ok(())
    }

    fn validate_load_profile(&self) -> Result<()> {
        if self.load_profile.is_empty() {
            return Err(anyhow!("load profile has no steps"));
        }
        let mut prev: Option<f64> = None;
        for step in &self.load_profile {
            if !(0.0..CYCLE_HOURS).contains(&step.start_hour) {
                return Err(anyhow!(
                    "load step start hour {} outside [0, {CYCLE_HOURS})",
                    step.start_hour
                ));
            }
            if let Some(p) = prev {
                if step.start_hour <= p {
                    return Err(anyhow!(
                        "load step start hours must be strictly increasing ({} after {p})",
                        step.start_hour
                    ));
                }
            }
            if !step.demand_mw.is_finite() || step.demand_mw.value() < 0.0 {
                return Err(anyhow!("load demand must be finite and >= 0"));
            }
            prev = Some(step.start_hour);
        }
        Ok(())
    }
}

fn check_rate(label: &str, rate: AnnualRate) -> Result<()> {
    if !rate.is_finite() || rate.value() < 0.0 {
        return Err(anyhow!("{label} rate must be finite and >= 0, got {rate}"));
    }
    Ok(())
}

pub fn load_config_from_path(path: &Path) -> Result<SimulationConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading simulation config '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing simulation config yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing simulation config json")
        }
        Some(ext) if ext.eq_ignore_ascii_case("toml") => {
            toml::from_str(&data).context("parsing simulation config toml")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing simulation config"),
    }
}

/// Render a config in the format implied by `path`'s extension (YAML when
/// unknown).
pub fn render_config(config: &SimulationConfig, path: Option<&Path>) -> Result<String> {
    match path.and_then(|p| p.extension()).and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::to_string_pretty(config).context("serializing config to json")
        }
        Some(ext) if ext.eq_ignore_ascii_case("toml") => {
            toml::to_string_pretty(config).context("serializing config to toml")
        }
        _ => serde_yaml::to_string(config).context("serializing config to yaml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_reference_system() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.seed, 4);
        assert_eq!(cfg.generators.len(), 3);
        assert_eq!(cfg.generators[0].failure_per_year, AnnualRate(36.5));
        assert_eq!(cfg.weather.repair_per_year, AnnualRate(438.0));
        assert_eq!(cfg.lines[1].adverse_failure_per_year, AnnualRate(100.0));
        assert_eq!(cfg.capacity.generator_mw, Megawatts(75.0));
        assert_eq!(cfg.convergence.min_years, 50);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let cfg: SimulationConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, SimulationConfig::default());
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = "seed: 11\nconvergence:\n  cv_threshold: 0.1\n";
        let cfg: SimulationConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.seed, 11);
        assert_eq!(cfg.convergence.cv_threshold, 0.1);
        assert_eq!(cfg.convergence.min_years, 50);
    }

    #[test]
    fn test_validate_rejects_wrong_topology() {
        let mut cfg = SimulationConfig::default();
        cfg.generators.pop();
        assert!(cfg.validate().is_err());

        let mut cfg = SimulationConfig::default();
        cfg.lines.push(cfg.lines[0]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_load_table() {
        let cfg = SimulationConfig::default().with_load_profile(vec![]);
        assert!(cfg.validate().is_err());

        let cfg = SimulationConfig::default()
            .with_load_profile(vec![LoadStep::new(4.0, 60.0), LoadStep::new(2.0, 60.0)]);
        assert!(cfg.validate().is_err());

        let cfg = SimulationConfig::default().with_load_profile(vec![LoadStep::new(24.0, 60.0)]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let mut cfg = SimulationConfig::default();
        cfg.weather.failure_per_year = AnnualRate(-1.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let cfg = SimulationConfig::default().with_max_iterations(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_and_render_each_format() {
        let dir = tempdir().unwrap();
        let cfg = SimulationConfig::default().with_seed(99);
        for name in ["cfg.yaml", "cfg.json", "cfg.toml"] {
            let path = dir.path().join(name);
            let text = render_config(&cfg, Some(&path)).unwrap();
            fs::write(&path, text).unwrap();
            let back = load_config_from_path(&path).unwrap();
            assert_eq!(back, cfg, "format {name}");
        }
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.conf");
        fs::write(&path, "{\"seed\": 8}").unwrap();
        let cfg = load_config_from_path(&path).unwrap();
        assert_eq!(cfg.seed, 8);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_config_from_path(Path::new("/nonexistent/relsim.yaml")).unwrap_err();
        assert!(err.to_string().contains("reading simulation config"));
    }
}

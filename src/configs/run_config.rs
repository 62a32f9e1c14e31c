use std::{fs, path::Path};

use rand_distr::{Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::{
    data::Dataset,
    error::{Error, Result},
    instrumentation::ClockScope,
    problem::{LinearRegression, LogisticRegression},
};

/// The model whose loss is minimized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    #[default]
    LinearRegression,
    LogisticRegression,
}

impl GradientKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LinearRegression => "linear_regression",
            Self::LogisticRegression => "logistic_regression",
        }
    }

    /// Evaluates the mean loss of `weights` over the whole dataset.
    pub fn loss(&self, dataset: &Dataset, weights: &[f64]) -> f64 {
        match self {
            Self::LinearRegression => dataset.loss(&LinearRegression, weights),
            Self::LogisticRegression => dataset.loss(&LogisticRegression, weights),
        }
    }
}

/// How workers write their gradients into the shared iterate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Hogwild,
    Naive,
    Segmented,
    Independent,
    Shared,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hogwild => "hogwild",
            Self::Naive => "naive",
            Self::Segmented => "segmented",
            Self::Independent => "independent",
            Self::Shared => "shared",
        }
    }
}

/// How the iterate is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSpec {
    Const { value: f64 },
    Uniform { low: f64, high: f64 },
    Normal { mean: f64, std_dev: f64 },
}

impl Default for InitSpec {
    fn default() -> Self {
        Self::Const { value: 0. }
    }
}

/// The configuration of a single benchmark run, read from JSON.
///
/// Every field is optional in the JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub threads: usize,
    pub step_size: f64,
    /// The total amount of updates across every thread.
    pub iterations: usize,
    pub log_points: usize,
    pub gradient: GradientKind,
    pub strategy: StrategyKind,
    /// Drawn from the OS when absent.
    pub seed: Option<u64>,
    pub track_phases: bool,
    /// What the phase timers measure, per-thread CPU time where available.
    pub clock: ClockScope,
    pub init: InitSpec,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            step_size: 1e-6,
            iterations: 10_000_000,
            log_points: 50,
            gradient: GradientKind::default(),
            strategy: StrategyKind::default(),
            seed: None,
            track_phases: true,
            clock: ClockScope::default(),
            init: InitSpec::default(),
        }
    }
}

impl RunConfig {
    /// Reads and validates a `RunConfig` from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a `RunConfig` from a JSON document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is usable before a run starts.
    ///
    /// # Returns
    /// An `InvalidConfig` describing the first invalid value found.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::InvalidConfig("threads must be at least 1".into()));
        }

        if !(self.step_size.is_finite() && self.step_size > 0.) {
            return Err(Error::InvalidConfig(format!(
                "step_size must be positive and finite, got {}",
                self.step_size
            )));
        }

        if self.log_points == 0 {
            return Err(Error::InvalidConfig("log_points must be at least 1".into()));
        }

        match self.init {
            InitSpec::Const { value } if !value.is_finite() => Err(Error::InvalidConfig(
                format!("const init value must be finite, got {value}"),
            )),
            InitSpec::Const { .. } => Ok(()),
            InitSpec::Uniform { low, high } => Uniform::new(low, high)
                .map(|_| ())
                .map_err(|e| Error::InvalidConfig(format!("invalid uniform init: {e}"))),
            InitSpec::Normal { mean, std_dev } => Normal::new(mean, std_dev)
                .map(|_| ())
                .map_err(|e| Error::InvalidConfig(format!("invalid normal init: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = RunConfig::from_json("{}").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.iterations, 10_000_000);
        assert_eq!(config.log_points, 50);
    }

    #[test]
    fn parses_every_field() {
        let raw = r#"{
            "threads": 8,
            "step_size": 0.01,
            "iterations": 1000,
            "log_points": 10,
            "gradient": "logistic_regression",
            "strategy": "segmented",
            "seed": 7,
            "track_phases": false,
            "clock": "wall",
            "init": { "normal": { "mean": 0.0, "std_dev": 0.1 } }
        }"#;

        let config = RunConfig::from_json(raw).unwrap();

        assert_eq!(config.threads, 8);
        assert_eq!(config.gradient, GradientKind::LogisticRegression);
        assert_eq!(config.strategy, StrategyKind::Segmented);
        assert_eq!(config.seed, Some(7));
        assert!(!config.track_phases);
        assert_eq!(config.clock, ClockScope::Wall);
        assert_eq!(
            config.init,
            InitSpec::Normal {
                mean: 0.,
                std_dev: 0.1
            }
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let invalid = [
            r#"{ "threads": 0 }"#,
            r#"{ "step_size": 0.0 }"#,
            r#"{ "step_size": -1e-3 }"#,
            r#"{ "log_points": 0 }"#,
            r#"{ "init": { "uniform": { "low": 1.0, "high": -1.0 } } }"#,
            r#"{ "init": { "normal": { "mean": 0.0, "std_dev": -1.0 } } }"#,
        ];

        for raw in invalid {
            assert!(
                matches!(RunConfig::from_json(raw), Err(Error::InvalidConfig(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_unknown_strategy() {
        let result = RunConfig::from_json(r#"{ "strategy": "locked" }"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }
}

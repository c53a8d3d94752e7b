//! Limits and start-up values of the application, with defaults, optionally read from a task
//! document:
//! ```text
//! graph
//! formula: x^2 + x + 1
//! domain: -1, 1
//! resolution: 5000
//! max_formula_length: 5000
//! probability
//! max_outcomes: 4
//! max_repetitions: 8
//! tolerance: 1e-6
//! ode
//! max_degree: 10
//! max_steps: 1000000
//! logging
//! loglevel: info
//! ```
use crate::Utils::logger::parse_level;
use crate::Utils::task_parser::{TaskParseError, Value, parse_document};
use crate::numerical::linear_ODE::{MAX_ODE_DEGREE, ODE_MAX_STEPS};
use crate::numerical::sampler::PLOT_INTERVALS;
use crate::probability::proba_tree::{MAX_OUTCOMES, OUTCOMES_HARD_CAP, MAX_REPETITIONS, PROBABILITY_TOLERANCE};
use crate::symbolic::parse_expr::MAX_FUNC_LENGTH;
use log::{info, warn};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(TaskParseError),
    InvalidValue {
        section: String,
        key: String,
        found: String,
        expected: &'static str,
    },
    InvalidLogLevel(String),
    /// values that are well formed but not usable together, e.g. domain min >= max
    Inconsistent(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Task document: {}", e),
            ConfigError::InvalidValue {
                section,
                key,
                found,
                expected,
            } => write!(
                f,
                "{}.{}: expected {}, found '{}'",
                section, key, expected, found
            ),
            ConfigError::InvalidLogLevel(level) => write!(
                f,
                "loglevel must be debug, info, warn, error, off or none, found '{}'",
                level
            ),
            ConfigError::Inconsistent(reason) => write!(f, "Inconsistent configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<TaskParseError> for ConfigError {
    fn from(e: TaskParseError) -> Self {
        ConfigError::Parse(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphAnalyzeConfig {
    /// sampling intervals of the grapher
    pub resolution: usize,
    pub max_formula_length: usize,
    pub max_outcomes: usize,
    pub max_repetitions: usize,
    pub max_ode_degree: usize,
    pub probability_tolerance: f64,
    pub ode_max_steps: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub formula: String,
    pub loglevel: String,
}

impl Default for GraphAnalyzeConfig {
    fn default() -> Self {
        GraphAnalyzeConfig {
            resolution: PLOT_INTERVALS,
            max_formula_length: MAX_FUNC_LENGTH,
            max_outcomes: MAX_OUTCOMES,
            max_repetitions: MAX_REPETITIONS,
            max_ode_degree: MAX_ODE_DEGREE,
            probability_tolerance: PROBABILITY_TOLERANCE,
            ode_max_steps: ODE_MAX_STEPS,
            min_x: -1.0,
            max_x: 1.0,
            formula: "x^2 + x + 1".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

fn invalid(section: &str, key: &str, values: &[Value], expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        found: values
            .iter()
            .map(|v| v.to_string_value())
            .collect::<Vec<_>>()
            .join(", "),
        expected,
    }
}

fn single_usize(section: &str, key: &str, values: &[Value]) -> Result<usize, ConfigError> {
    match values {
        [Value::Integer(i)] if *i >= 0 => Ok(*i as usize),
        _ => Err(invalid(section, key, values, "a non-negative integer")),
    }
}

fn single_float(section: &str, key: &str, values: &[Value]) -> Result<f64, ConfigError> {
    match values {
        [value] => value
            .as_float()
            .ok_or_else(|| invalid(section, key, values, "a number")),
        _ => Err(invalid(section, key, values, "a number")),
    }
}

fn float_pair(section: &str, key: &str, values: &[Value]) -> Result<(f64, f64), ConfigError> {
    match values {
        [a, b] => match (a.as_float(), b.as_float()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(invalid(section, key, values, "two numbers")),
        },
        _ => Err(invalid(section, key, values, "two numbers")),
    }
}

/// the text of all values, commas restored
fn text(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string_value())
        .collect::<Vec<_>>()
        .join(", ")
}

impl GraphAnalyzeConfig {
    /// Defaults overridden by the keys present in `document`. Unknown sections and keys are
    /// skipped with a warning.
    pub fn from_task_document(document: &str) -> Result<GraphAnalyzeConfig, ConfigError> {
        let parsed = parse_document(document)?;
        let mut config = GraphAnalyzeConfig::default();
        for (section, keys) in parsed.iter() {
            for (key, values) in keys.iter() {
                config.apply(section, key, values)?;
            }
        }
        config.validate()?;
        info!("configuration loaded: {:?}", config);
        Ok(config)
    }

    fn apply(&mut self, section: &str, key: &str, values: &[Value]) -> Result<(), ConfigError> {
        match (section, key) {
            ("graph", "formula") => self.formula = text(values),
            ("graph", "domain") => {
                let (min_x, max_x) = float_pair(section, key, values)?;
                self.min_x = min_x;
                self.max_x = max_x;
            }
            ("graph", "resolution") => self.resolution = single_usize(section, key, values)?,
            ("graph", "max_formula_length") => {
                self.max_formula_length = single_usize(section, key, values)?
            }
            ("probability", "max_outcomes") => self.max_outcomes = single_usize(section, key, values)?,
            ("probability", "max_repetitions") => {
                self.max_repetitions = single_usize(section, key, values)?
            }
            ("probability", "tolerance") => {
                self.probability_tolerance = single_float(section, key, values)?
            }
            ("ode", "max_degree") => self.max_ode_degree = single_usize(section, key, values)?,
            ("ode", "max_steps") => self.ode_max_steps = single_usize(section, key, values)?,
            ("logging", "loglevel") => self.loglevel = text(values),
            _ => warn!("unknown configuration key {}.{} ignored", section, key),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(ConfigError::Inconsistent("resolution must be at least 1".to_string()));
        }
        if !(self.min_x.is_finite() && self.max_x.is_finite() && self.min_x < self.max_x) {
            return Err(ConfigError::Inconsistent(format!(
                "domain [{}, {}] is empty",
                self.min_x, self.max_x
            )));
        }
        if self.max_outcomes == 0 || self.max_outcomes > OUTCOMES_HARD_CAP {
            return Err(ConfigError::Inconsistent(format!(
                "max_outcomes must be in 1..={}",
                OUTCOMES_HARD_CAP
            )));
        }
        if self.max_ode_degree == 0 {
            return Err(ConfigError::Inconsistent("max_degree must be at least 1".to_string()));
        }
        if !(self.probability_tolerance > 0.0) {
            return Err(ConfigError::Inconsistent("tolerance must be positive".to_string()));
        }
        parse_level(&self.loglevel)?;
        Ok(())
    }
}

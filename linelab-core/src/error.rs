//! Error types for graph wiring and evaluation.
//!
//! Configuration errors are fatal and surface at construction time. Warm-up
//! underflow and out-of-range history reads are not errors: they yield NaN.

use thiserror::Error;

/// Errors raised while constructing indicators or wiring them into a graph.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{indicator}: period must be positive, got {period}")]
    NonPositivePeriod { indicator: &'static str, period: i64 },
    #[error("{indicator}: invalid parameter {name} = {value}")]
    InvalidParameter {
        indicator: &'static str,
        name: &'static str,
        value: f64,
    },
    #[error("{indicator}: expected {expected} input(s), got {actual}")]
    InputCount {
        indicator: String,
        expected: usize,
        actual: usize,
    },
    #[error("{indicator}: min period {min_period} is shorter than its inputs' {required}")]
    MinPeriodBelowInputs {
        indicator: String,
        min_period: usize,
        required: usize,
    },
    #[error("inputs have mismatched lengths: {lengths:?}")]
    MismatchedInputs { lengths: Vec<usize> },
    #[error("unknown line: {0}")]
    UnknownLine(String),
    #[error("unknown node: {0}")]
    UnknownNode(usize),
    #[error("duplicate indicator name: {0}")]
    DuplicateName(String),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors raised while driving a wired graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("graph is stopped; call start() before feeding more bars")]
    Stopped,
}

/// Validate an indicator period, rejecting zero.
pub(crate) fn check_period(indicator: &'static str, period: usize) -> Result<usize, ConfigError> {
    if period == 0 {
        return Err(ConfigError::NonPositivePeriod {
            indicator,
            period: 0,
        });
    }
    Ok(period)
}

/// Convert a signed configured period into a `usize`, rejecting values <= 0.
pub(crate) fn period_from_config(indicator: &'static str, period: i64) -> Result<usize, ConfigError> {
    if period <= 0 {
        return Err(ConfigError::NonPositivePeriod { indicator, period });
    }
    Ok(period as usize)
}

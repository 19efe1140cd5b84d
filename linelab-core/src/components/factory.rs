//! Factory: converts an `IndicatorConfig` into a runtime `Computation`.
//!
//! Configs carry signed periods so that a negative value read from a file is
//! reported as `NonPositivePeriod` instead of failing to deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{period_from_config, ConfigError};
use crate::indicators::envelope::DEFAULT_PERC;
use crate::indicators::oscillator::{DEFAULT_FAST, DEFAULT_PERIOD, DEFAULT_SLOW};
use crate::indicators::{
    AverageKind, AverageOscillator, DualAverageOscillator, Envelope, MovingAverage,
};

use super::computation::Computation;

// ─── Config ──────────────────────────────────────────────────────────

/// Declarative description of one indicator node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorConfig {
    /// A bare moving average.
    Average {
        average: AverageKind,
        #[serde(default = "default_period")]
        period: i64,
    },
    /// Price minus its moving average.
    Oscillator {
        average: AverageKind,
        #[serde(default = "default_period")]
        period: i64,
    },
    /// Fast average minus slow average.
    DualOscillator {
        average: AverageKind,
        #[serde(default = "default_fast")]
        fast: i64,
        #[serde(default = "default_slow")]
        slow: i64,
    },
    /// Average with percentage bands.
    Envelope {
        average: AverageKind,
        #[serde(default = "default_period")]
        period: i64,
        #[serde(default = "default_perc")]
        perc: f64,
    },
}

fn default_period() -> i64 {
    DEFAULT_PERIOD as i64
}

fn default_fast() -> i64 {
    DEFAULT_FAST as i64
}

fn default_slow() -> i64 {
    DEFAULT_SLOW as i64
}

fn default_perc() -> f64 {
    DEFAULT_PERC
}

impl IndicatorConfig {
    pub fn average(kind: AverageKind, period: i64) -> Self {
        IndicatorConfig::Average {
            average: kind,
            period,
        }
    }

    pub fn oscillator(kind: AverageKind, period: i64) -> Self {
        IndicatorConfig::Oscillator {
            average: kind,
            period,
        }
    }

    pub fn dual_oscillator(kind: AverageKind, fast: i64, slow: i64) -> Self {
        IndicatorConfig::DualOscillator {
            average: kind,
            fast,
            slow,
        }
    }

    pub fn envelope(kind: AverageKind, period: i64, perc: f64) -> Self {
        IndicatorConfig::Envelope {
            average: kind,
            period,
            perc,
        }
    }

    pub fn kind(&self) -> AverageKind {
        match self {
            IndicatorConfig::Average { average, .. }
            | IndicatorConfig::Oscillator { average, .. }
            | IndicatorConfig::DualOscillator { average, .. }
            | IndicatorConfig::Envelope { average, .. } => *average,
        }
    }

    /// Short label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorConfig::Average { .. } => "average",
            IndicatorConfig::Oscillator { .. } => "oscillator",
            IndicatorConfig::DualOscillator { .. } => "dual_oscillator",
            IndicatorConfig::Envelope { .. } => "envelope",
        }
    }

    /// Every configured indicator reads exactly one line.
    pub fn input_count(&self) -> usize {
        1
    }

    // ─── Build ───────────────────────────────────────────────────────

    /// Construct the computation for inputs whose min periods are
    /// `input_min_periods`. The largest of them drives warm-up offsets.
    pub fn build(&self, input_min_periods: &[usize]) -> Result<Box<dyn Computation>, ConfigError> {
        if input_min_periods.len() != self.input_count() {
            return Err(ConfigError::InputCount {
                indicator: self.label().to_string(),
                expected: self.input_count(),
                actual: input_min_periods.len(),
            });
        }
        let m = input_min_periods.iter().copied().max().unwrap_or(1).max(1);
        let kind = self.kind();

        Ok(match *self {
            IndicatorConfig::Average { period, .. } => {
                let period = period_from_config(kind.label(), period)?;
                Box::new(MovingAverage::with_input(kind, period, m)?)
            }
            IndicatorConfig::Oscillator { period, .. } => {
                let period = period_from_config("oscillator", period)?;
                Box::new(AverageOscillator::with_input(kind, period, m)?)
            }
            IndicatorConfig::DualOscillator { fast, slow, .. } => {
                let fast = period_from_config("dual_oscillator", fast)?;
                let slow = period_from_config("dual_oscillator", slow)?;
                Box::new(DualAverageOscillator::with_input(kind, fast, slow, m)?)
            }
            IndicatorConfig::Envelope { period, perc, .. } => {
                let period = period_from_config("envelope", period)?;
                Box::new(Envelope::with_input(kind, period, perc, m)?)
            }
        })
    }
}

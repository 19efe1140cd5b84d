//! Closed set of moving-average methods.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Dema, Ema, Sma, Smma, Tema, Wma};
use crate::components::computation::Computation;
use crate::error::ConfigError;
use crate::lines::{Inputs, LineSet};

/// Averaging method selector used by oscillators, envelopes and config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageKind {
    Sma,
    Ema,
    Wma,
    Smma,
    Dema,
    Tema,
}

impl AverageKind {
    pub const ALL: [AverageKind; 6] = [
        AverageKind::Sma,
        AverageKind::Ema,
        AverageKind::Wma,
        AverageKind::Smma,
        AverageKind::Dema,
        AverageKind::Tema,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AverageKind::Sma => "sma",
            AverageKind::Ema => "ema",
            AverageKind::Wma => "wma",
            AverageKind::Smma => "smma",
            AverageKind::Dema => "dema",
            AverageKind::Tema => "tema",
        }
    }

    /// Min period of this average over raw data (input min period 1).
    pub fn min_period_for(self, period: usize) -> usize {
        match self {
            AverageKind::Dema => (2 * period).saturating_sub(1),
            AverageKind::Tema => 3 * period.saturating_sub(1) + 1,
            _ => period,
        }
    }
}

impl fmt::Display for AverageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Any of the six moving averages behind one concrete type.
#[derive(Debug, Clone)]
pub enum MovingAverage {
    Simple(Sma),
    Exponential(Ema),
    Weighted(Wma),
    Smoothed(Smma),
    DoubleExponential(Dema),
    TripleExponential(Tema),
}

impl MovingAverage {
    pub fn new(kind: AverageKind, period: usize) -> Result<Self, ConfigError> {
        Self::with_input(kind, period, 1)
    }

    pub fn with_input(
        kind: AverageKind,
        period: usize,
        input_min_period: usize,
    ) -> Result<Self, ConfigError> {
        Ok(match kind {
            AverageKind::Sma => MovingAverage::Simple(Sma::with_input(period, input_min_period)?),
            AverageKind::Ema => {
                MovingAverage::Exponential(Ema::with_input(period, input_min_period)?)
            }
            AverageKind::Wma => MovingAverage::Weighted(Wma::with_input(period, input_min_period)?),
            AverageKind::Smma => {
                MovingAverage::Smoothed(Smma::with_input(period, input_min_period)?)
            }
            AverageKind::Dema => {
                MovingAverage::DoubleExponential(Dema::with_input(period, input_min_period)?)
            }
            AverageKind::Tema => {
                MovingAverage::TripleExponential(Tema::with_input(period, input_min_period)?)
            }
        })
    }

    pub fn kind(&self) -> AverageKind {
        match self {
            MovingAverage::Simple(_) => AverageKind::Sma,
            MovingAverage::Exponential(_) => AverageKind::Ema,
            MovingAverage::Weighted(_) => AverageKind::Wma,
            MovingAverage::Smoothed(_) => AverageKind::Smma,
            MovingAverage::DoubleExponential(_) => AverageKind::Dema,
            MovingAverage::TripleExponential(_) => AverageKind::Tema,
        }
    }

    pub fn period(&self) -> usize {
        match self {
            MovingAverage::Simple(ma) => ma.period(),
            MovingAverage::Exponential(ma) => ma.period(),
            MovingAverage::Weighted(ma) => ma.period(),
            MovingAverage::Smoothed(ma) => ma.period(),
            MovingAverage::DoubleExponential(ma) => ma.period(),
            MovingAverage::TripleExponential(ma) => ma.period(),
        }
    }

    fn inner(&self) -> &dyn Computation {
        match self {
            MovingAverage::Simple(ma) => ma,
            MovingAverage::Exponential(ma) => ma,
            MovingAverage::Weighted(ma) => ma,
            MovingAverage::Smoothed(ma) => ma,
            MovingAverage::DoubleExponential(ma) => ma,
            MovingAverage::TripleExponential(ma) => ma,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Computation {
        match self {
            MovingAverage::Simple(ma) => ma,
            MovingAverage::Exponential(ma) => ma,
            MovingAverage::Weighted(ma) => ma,
            MovingAverage::Smoothed(ma) => ma,
            MovingAverage::DoubleExponential(ma) => ma,
            MovingAverage::TripleExponential(ma) => ma,
        }
    }
}

impl Computation for MovingAverage {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn min_period(&self) -> usize {
        self.inner().min_period()
    }

    fn lines(&self) -> &LineSet {
        self.inner().lines()
    }

    fn processed(&self) -> usize {
        self.inner().processed()
    }

    fn advance_one(&mut self, inputs: &Inputs<'_>) {
        self.inner_mut().advance_one(inputs);
    }

    fn evaluate_range(&mut self, inputs: &Inputs<'_>, start: usize, end: usize) {
        self.inner_mut().evaluate_range(inputs, start, end);
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }
}

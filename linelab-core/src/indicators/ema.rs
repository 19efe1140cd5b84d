//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = EMA[t-1] + alpha * (x[t] - EMA[t-1]), alpha = 2 / (period + 1)
//! Seed: EMA[period-1] = SMA of the first `period` values.
//! Min period: period.

use super::average::{Average, AverageKernel};
use crate::error::{check_period, ConfigError};

/// Seeded first-order recursion shared by EMA and SMMA.
///
/// Seed and recursion are both in difference form, so a constant input is an
/// exact fixed point. NaN propagates: once a NaN enters the seed or the
/// recursion, every later output is NaN.
#[derive(Debug, Clone)]
pub(crate) struct SeededRecursion {
    period: usize,
    alpha: f64,
    seen: usize,
    /// Running seed mean until `seen == period`, then the previous output.
    prev: f64,
}

impl SeededRecursion {
    pub(crate) fn new(period: usize, alpha: f64) -> Self {
        Self {
            period,
            alpha,
            seen: 0,
            prev: 0.0,
        }
    }

    pub(crate) fn period(&self) -> usize {
        self.period
    }

    pub(crate) fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn next(&mut self, x: f64) -> f64 {
        if self.seen < self.period {
            self.seen += 1;
            self.prev += (x - self.prev) / self.seen as f64;
            if self.seen < self.period {
                return f64::NAN;
            }
        } else {
            self.prev += self.alpha * (x - self.prev);
        }
        self.prev
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.period, self.alpha);
    }
}

#[derive(Debug, Clone)]
pub struct ExponentialKernel(SeededRecursion);

impl ExponentialKernel {
    pub fn new(period: usize) -> Self {
        Self(SeededRecursion::new(period, 2.0 / (period as f64 + 1.0)))
    }

    pub fn alpha(&self) -> f64 {
        self.0.alpha()
    }
}

impl AverageKernel for ExponentialKernel {
    fn label(&self) -> &'static str {
        "ema"
    }

    fn period(&self) -> usize {
        self.0.period()
    }

    fn step<F: Fn(usize) -> f64>(&mut self, back: F) -> f64 {
        self.0.next(back(0))
    }

    fn reset(&mut self) {
        self.0.reset();
    }
}

pub type Ema = Average<ExponentialKernel>;

impl Ema {
    pub fn new(period: usize) -> Result<Self, ConfigError> {
        Self::with_input(period, 1)
    }

    pub fn with_input(period: usize, input_min_period: usize) -> Result<Self, ConfigError> {
        let period = check_period("ema", period)?;
        Ok(Average::from_kernel(
            ExponentialKernel::new(period),
            input_min_period,
        ))
    }
}

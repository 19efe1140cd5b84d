//! Simple Moving Average (SMA).
//!
//! Rolling mean over a window of `period` inputs.
//! Min period: period (first valid value at index period-1 on raw data).

use super::average::{Average, AverageKernel};
use crate::error::{check_period, ConfigError};

/// Rolling window mean with NaN bookkeeping.
///
/// The mean is kept in difference form (`mean += (entering - leaving) / period`)
/// so a constant input stays exactly constant. A NaN inside the window makes the
/// output NaN; once it leaves, the mean is rebuilt from the window.
#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    mean: f64,
    nan_count: usize,
    seen: usize,
    stale: bool,
}

impl RollingMean {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            mean: 0.0,
            nan_count: 0,
            seen: 0,
            stale: false,
        }
    }
}

/// Mean of the `n` newest values, oldest first, as `m += (x - m) / k`.
fn running_mean<F: Fn(usize) -> f64>(back: &F, n: usize) -> f64 {
    let mut mean = 0.0;
    for (k, ago) in (0..n).rev().enumerate() {
        mean += (back(ago) - mean) / (k + 1) as f64;
    }
    mean
}

impl AverageKernel for RollingMean {
    fn label(&self) -> &'static str {
        "sma"
    }

    fn period(&self) -> usize {
        self.period
    }

    fn step<F: Fn(usize) -> f64>(&mut self, back: F) -> f64 {
        let entering = back(0);
        self.seen += 1;
        if entering.is_nan() {
            self.nan_count += 1;
        }

        let leaving = if self.seen > self.period {
            let leaving = back(self.period);
            if leaving.is_nan() {
                self.nan_count = self.nan_count.saturating_sub(1);
            }
            Some(leaving)
        } else {
            None
        };

        if self.nan_count > 0 {
            self.stale = true;
            return f64::NAN;
        }

        if self.stale {
            self.mean = running_mean(&back, self.seen.min(self.period));
            self.stale = false;
        } else if let Some(leaving) = leaving {
            self.mean += (entering - leaving) / self.period as f64;
        } else {
            self.mean += (entering - self.mean) / self.seen as f64;
        }

        if self.seen < self.period {
            f64::NAN
        } else {
            self.mean
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.period);
    }
}

pub type Sma = Average<RollingMean>;

impl Sma {
    pub fn new(period: usize) -> Result<Self, ConfigError> {
        Self::with_input(period, 1)
    }

    /// SMA over an input that needs `input_min_period` bars to warm up.
    pub fn with_input(period: usize, input_min_period: usize) -> Result<Self, ConfigError> {
        let period = check_period("sma", period)?;
        Ok(Average::from_kernel(RollingMean::new(period), input_min_period))
    }
}

//! Moving-average oscillators.
//!
//! `AverageOscillator` reports `price - average(price)`; `DualAverageOscillator`
//! reports `fast - slow` for two averages of the same kind. Either way the
//! subtraction only happens once every child average is ready.

use super::moving_average::{AverageKind, MovingAverage};
use crate::components::computation::{batch_bounds, Computation, Progress};
use crate::error::ConfigError;
use crate::lines::{Inputs, LineId, LineSet};

/// Default single-form period.
pub const DEFAULT_PERIOD: usize = 30;
/// Default dual-form fast period.
pub const DEFAULT_FAST: usize = 12;
/// Default dual-form slow period.
pub const DEFAULT_SLOW: usize = 26;

/// Price minus its moving average.
#[derive(Debug, Clone)]
pub struct AverageOscillator {
    name: String,
    lines: LineSet,
    progress: Progress,
    average: MovingAverage,
}

impl AverageOscillator {
    pub fn new(kind: AverageKind, period: usize) -> Result<Self, ConfigError> {
        Self::with_input(kind, period, 1)
    }

    pub fn with_input(
        kind: AverageKind,
        period: usize,
        input_min_period: usize,
    ) -> Result<Self, ConfigError> {
        let average = MovingAverage::with_input(kind, period, input_min_period)?;
        let line = format!("{kind}osc");
        Ok(Self {
            name: format!("{line}_{period}"),
            lines: LineSet::with_names(&[line.as_str()]),
            progress: Progress::new(average.min_period()),
            average,
        })
    }

    pub fn sma(period: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Sma, period)
    }

    pub fn ema(period: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Ema, period)
    }

    pub fn wma(period: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Wma, period)
    }

    pub fn smma(period: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Smma, period)
    }

    pub fn dema(period: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Dema, period)
    }

    pub fn tema(period: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Tema, period)
    }

    pub fn kind(&self) -> AverageKind {
        self.average.kind()
    }

    pub fn period(&self) -> usize {
        self.average.period()
    }

    /// The underlying average, for inspection.
    pub fn average(&self) -> &MovingAverage {
        &self.average
    }
}

impl Computation for AverageOscillator {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_period(&self) -> usize {
        self.progress.min_period()
    }

    fn lines(&self) -> &LineSet {
        &self.lines
    }

    fn processed(&self) -> usize {
        self.progress.processed()
    }

    fn advance_one(&mut self, inputs: &Inputs<'_>) {
        self.average.advance_one(inputs);
        let value = if self.progress.tick() {
            inputs.line(0).value_at(0) - self.average.value_at(0)
        } else {
            f64::NAN
        };
        self.lines.line_mut(LineId::PRIMARY).append(value);
    }

    fn evaluate_range(&mut self, inputs: &Inputs<'_>, start: usize, end: usize) {
        let Some((start, end)) = batch_bounds(self.progress.processed(), start, end, inputs.size())
        else {
            return;
        };
        self.average.evaluate_range(inputs, start, end);

        let price = inputs.line(0).as_slice();
        let avg = self.average.output().as_slice();
        let out = self.lines.line_mut(LineId::PRIMARY);
        let storage = out.storage_to(end);
        for i in start..end {
            storage[i] = if self.progress.tick() {
                price[i] - avg[i]
            } else {
                f64::NAN
            };
        }
        out.reposition(end - 1);
    }

    fn reset(&mut self) {
        self.lines.reset();
        self.progress.reset();
        self.average.reset();
    }
}

/// Fast average minus slow average of the same kind.
///
/// `fast < slow` is conventional but not enforced.
#[derive(Debug, Clone)]
pub struct DualAverageOscillator {
    name: String,
    lines: LineSet,
    progress: Progress,
    fast: MovingAverage,
    slow: MovingAverage,
}

impl DualAverageOscillator {
    pub fn new(kind: AverageKind, fast: usize, slow: usize) -> Result<Self, ConfigError> {
        Self::with_input(kind, fast, slow, 1)
    }

    pub fn with_input(
        kind: AverageKind,
        fast: usize,
        slow: usize,
        input_min_period: usize,
    ) -> Result<Self, ConfigError> {
        let fast_ma = MovingAverage::with_input(kind, fast, input_min_period)?;
        let slow_ma = MovingAverage::with_input(kind, slow, input_min_period)?;
        let line = format!("{kind}osc");
        Ok(Self {
            name: format!("{line}_{fast}_{slow}"),
            lines: LineSet::with_names(&[line.as_str()]),
            progress: Progress::new(fast_ma.min_period().max(slow_ma.min_period())),
            fast: fast_ma,
            slow: slow_ma,
        })
    }

    pub fn sma(fast: usize, slow: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Sma, fast, slow)
    }

    pub fn ema(fast: usize, slow: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Ema, fast, slow)
    }

    pub fn wma(fast: usize, slow: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Wma, fast, slow)
    }

    pub fn smma(fast: usize, slow: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Smma, fast, slow)
    }

    pub fn dema(fast: usize, slow: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Dema, fast, slow)
    }

    pub fn tema(fast: usize, slow: usize) -> Result<Self, ConfigError> {
        Self::new(AverageKind::Tema, fast, slow)
    }

    pub fn kind(&self) -> AverageKind {
        self.fast.kind()
    }

    pub fn fast(&self) -> &MovingAverage {
        &self.fast
    }

    pub fn slow(&self) -> &MovingAverage {
        &self.slow
    }
}

impl Computation for DualAverageOscillator {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_period(&self) -> usize {
        self.progress.min_period()
    }

    fn lines(&self) -> &LineSet {
        &self.lines
    }

    fn processed(&self) -> usize {
        self.progress.processed()
    }

    fn advance_one(&mut self, inputs: &Inputs<'_>) {
        self.fast.advance_one(inputs);
        self.slow.advance_one(inputs);
        let value = if self.progress.tick() {
            self.fast.value_at(0) - self.slow.value_at(0)
        } else {
            f64::NAN
        };
        self.lines.line_mut(LineId::PRIMARY).append(value);
    }

    fn evaluate_range(&mut self, inputs: &Inputs<'_>, start: usize, end: usize) {
        let Some((start, end)) = batch_bounds(self.progress.processed(), start, end, inputs.size())
        else {
            return;
        };
        self.fast.evaluate_range(inputs, start, end);
        self.slow.evaluate_range(inputs, start, end);

        let fast = self.fast.output().as_slice();
        let slow = self.slow.output().as_slice();
        let out = self.lines.line_mut(LineId::PRIMARY);
        let storage = out.storage_to(end);
        for i in start..end {
            storage[i] = if self.progress.tick() {
                fast[i] - slow[i]
            } else {
                f64::NAN
            };
        }
        out.reposition(end - 1);
    }

    fn reset(&mut self) {
        self.lines.reset();
        self.progress.reset();
        self.fast.reset();
        self.slow.reset();
    }
}

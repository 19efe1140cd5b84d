//! Double Exponential Moving Average (DEMA).
//!
//! DEMA = 2 * EMA(x) - EMA(EMA(x)).
//! Min period: 2 * period - 1 on raw data.

use std::slice;

use super::ema::Ema;
use crate::components::computation::{batch_bounds, Computation, Progress};
use crate::error::ConfigError;
use crate::lines::{Inputs, LineId, LineSet};

#[derive(Debug, Clone)]
pub struct Dema {
    name: String,
    period: usize,
    lines: LineSet,
    progress: Progress,
    ema1: Ema,
    ema2: Ema,
}

impl Dema {
    pub fn new(period: usize) -> Result<Self, ConfigError> {
        Self::with_input(period, 1)
    }

    pub fn with_input(period: usize, input_min_period: usize) -> Result<Self, ConfigError> {
        let ema1 = Ema::with_input(period, input_min_period)?;
        let ema2 = Ema::with_input(period, ema1.min_period())?;
        Ok(Self {
            name: format!("dema_{period}"),
            period,
            lines: LineSet::with_names(&["dema"]),
            progress: Progress::new(ema2.min_period()),
            ema1,
            ema2,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Computation for Dema {
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
        self.ema1.advance_one(inputs);
        self.ema2
            .advance_one(&Inputs::new(slice::from_ref(&self.ema1.output())));

        let value = if self.progress.tick() {
            2.0 * self.ema1.value_at(0) - self.ema2.value_at(0)
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
        self.ema1.evaluate_range(inputs, start, end);
        self.ema2
            .evaluate_range(&Inputs::new(slice::from_ref(&self.ema1.output())), start, end);

        let e1 = self.ema1.output().as_slice();
        let e2 = self.ema2.output().as_slice();
        let out = self.lines.line_mut(LineId::PRIMARY);
        let storage = out.storage_to(end);
        for i in start..end {
            storage[i] = if self.progress.tick() {
                2.0 * e1[i] - e2[i]
            } else {
                f64::NAN
            };
        }
        out.reposition(end - 1);
    }

    fn reset(&mut self) {
        self.lines.reset();
        self.progress.reset();
        self.ema1.reset();
        self.ema2.reset();
    }
}

//! Moving-average envelope.
//!
//! mid = average(x), top = mid * (1 + perc / 100), bot = mid * (1 - perc / 100).
//! Min period: the average's min period.

use super::moving_average::{AverageKind, MovingAverage};
use crate::components::computation::{batch_bounds, Computation, Progress};
use crate::error::ConfigError;
use crate::lines::{Inputs, LineId, LineSet};

pub const DEFAULT_PERC: f64 = 2.5;

const MID: LineId = LineId(0);
const TOP: LineId = LineId(1);
const BOT: LineId = LineId(2);

#[derive(Debug, Clone)]
pub struct Envelope {
    name: String,
    lines: LineSet,
    progress: Progress,
    average: MovingAverage,
    perc: f64,
    upper: f64,
    lower: f64,
}

impl Envelope {
    pub fn new(kind: AverageKind, period: usize, perc: f64) -> Result<Self, ConfigError> {
        Self::with_input(kind, period, perc, 1)
    }

    pub fn with_input(
        kind: AverageKind,
        period: usize,
        perc: f64,
        input_min_period: usize,
    ) -> Result<Self, ConfigError> {
        if !perc.is_finite() || perc < 0.0 {
            return Err(ConfigError::InvalidParameter {
                indicator: "envelope",
                name: "perc",
                value: perc,
            });
        }
        let average = MovingAverage::with_input(kind, period, input_min_period)?;
        Ok(Self {
            name: format!("{kind}envelope_{period}"),
            lines: LineSet::with_names(&["mid", "top", "bot"]),
            progress: Progress::new(average.min_period()),
            average,
            perc,
            upper: 1.0 + perc / 100.0,
            lower: 1.0 - perc / 100.0,
        })
    }

    pub fn perc(&self) -> f64 {
        self.perc
    }

    pub fn kind(&self) -> AverageKind {
        self.average.kind()
    }

    fn bands(&self, mid: f64) -> [f64; 3] {
        [mid, mid * self.upper, mid * self.lower]
    }
}

impl Computation for Envelope {
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
        let bands = if self.progress.tick() {
            self.bands(self.average.value_at(0))
        } else {
            [f64::NAN; 3]
        };
        for (id, value) in [MID, TOP, BOT].into_iter().zip(bands) {
            self.lines.line_mut(id).append(value);
        }
    }

    fn evaluate_range(&mut self, inputs: &Inputs<'_>, start: usize, end: usize) {
        let Some((start, end)) = batch_bounds(self.progress.processed(), start, end, inputs.size())
        else {
            return;
        };
        self.average.evaluate_range(inputs, start, end);

        let mut bands = Vec::with_capacity(end - start);
        for i in start..end {
            bands.push(if self.progress.tick() {
                self.bands(self.average.output().get(i))
            } else {
                [f64::NAN; 3]
            });
        }
        for (slot, id) in [MID, TOP, BOT].into_iter().enumerate() {
            let out = self.lines.line_mut(id);
            let storage = out.storage_to(end);
            for (offset, row) in bands.iter().enumerate() {
                storage[start + offset] = row[slot];
            }
            out.reposition(end - 1);
        }
    }

    fn reset(&mut self) {
        self.lines.reset();
        self.progress.reset();
        self.average.reset();
    }
}

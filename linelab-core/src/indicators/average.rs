//! Single-input moving averages driven by a shared per-bar kernel.
//!
//! `Average<K>` owns the output line, the warm-up counter and the input offset;
//! the kernel `K` owns the running state and the arithmetic. Both entry points
//! feed the kernel through the same `step` call, which is what keeps the
//! incremental and batch outputs bit-identical.

use std::fmt;

use crate::components::computation::{batch_bounds, Computation, Progress};
use crate::lines::{Inputs, LineId, LineSet};

/// Running state and arithmetic of one averaging method.
pub trait AverageKernel: Clone + Send + Sync + fmt::Debug {
    /// Line name and name prefix (e.g., "sma").
    fn label(&self) -> &'static str;

    /// Window length in bars.
    fn period(&self) -> usize;

    /// Consume the newest valid input and return the output for this bar
    /// (NaN until the kernel has seen a full window). `back(k)` reads the input
    /// `k` bars before the newest one and yields NaN before the series start.
    fn step<F: Fn(usize) -> f64>(&mut self, back: F) -> f64;

    fn reset(&mut self);
}

#[derive(Debug, Clone)]
pub struct Average<K> {
    name: String,
    lines: LineSet,
    progress: Progress,
    /// Index of the first input bar that carries a real value.
    offset: usize,
    kernel: K,
}

impl<K: AverageKernel> Average<K> {
    /// Wrap `kernel` reading an input whose own min period is `input_min_period`.
    ///
    /// The first `input_min_period - 1` input bars are warm-up placeholders and
    /// are never fed to the kernel, so `min_period = input_min_period + period - 1`.
    pub(crate) fn from_kernel(kernel: K, input_min_period: usize) -> Self {
        let offset = input_min_period.max(1) - 1;
        let label = kernel.label();
        Self {
            name: format!("{label}_{}", kernel.period()),
            lines: LineSet::with_names(&[label]),
            progress: Progress::new(offset + kernel.period()),
            offset,
            kernel,
        }
    }

    pub fn period(&self) -> usize {
        self.kernel.period()
    }
}

impl<K: AverageKernel> Computation for Average<K> {
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
        let input = inputs.line(0);
        let index = self.progress.processed();
        let raw = if index < self.offset {
            f64::NAN
        } else {
            self.kernel.step(|k| input.value_at(-(k as isize)))
        };
        let ready = self.progress.tick();
        self.lines
            .line_mut(LineId::PRIMARY)
            .append(if ready { raw } else { f64::NAN });
    }

    fn evaluate_range(&mut self, inputs: &Inputs<'_>, start: usize, end: usize) {
        let src = inputs.line(0).as_slice();
        let Some((start, end)) = batch_bounds(self.progress.processed(), start, end, src.len())
        else {
            return;
        };

        let out = self.lines.line_mut(LineId::PRIMARY);
        let storage = out.storage_to(end);
        for i in start..end {
            let raw = if i < self.offset {
                f64::NAN
            } else {
                self.kernel
                    .step(|k| if k <= i { src[i - k] } else { f64::NAN })
            };
            let ready = self.progress.tick();
            storage[i] = if ready { raw } else { f64::NAN };
        }
        out.reposition(end - 1);
    }

    fn reset(&mut self) {
        self.lines.reset();
        self.progress.reset();
        self.kernel.reset();
    }
}

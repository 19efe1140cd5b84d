//! Computation trait: the indicator protocol shared by every line producer.
//!
//! A computation owns an output `LineSet`, declares how many bars it needs
//! before producing real values (`min_period`), and offers two evaluation entry
//! points that must agree bit-for-bit:
//!
//! - `advance_one`: one new bar, reading the newest input values.
//! - `evaluate_range`: a whole range at once, inputs already holding history.
//!
//! Concrete indicators keep the agreement by routing both entry points through
//! the same per-bar kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lines::{Buffer, Inputs, LineId, LineSet};

/// Warm-up state of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Inputs bound, no bar processed yet.
    Uninitialized,
    /// Fewer than `min_period` bars processed; output receives NaN.
    WarmingUp,
    /// At least `min_period` bars processed; output receives real values.
    Ready,
}

impl Phase {
    pub fn from_counts(processed: usize, min_period: usize) -> Self {
        if processed == 0 {
            Phase::Uninitialized
        } else if processed < min_period {
            Phase::WarmingUp
        } else {
            Phase::Ready
        }
    }
}

/// Bar counter that drives the warm-up state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    processed: usize,
    min_period: usize,
}

impl Progress {
    pub fn new(min_period: usize) -> Self {
        Self {
            processed: 0,
            min_period: min_period.max(1),
        }
    }

    /// Count one more processed bar. Returns true once the computation is ready.
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.processed += 1;
        ready_at(self.min_period, self.processed - 1)
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn min_period(&self) -> usize {
        self.min_period
    }

    pub fn phase(&self) -> Phase {
        Phase::from_counts(self.processed, self.min_period)
    }

    pub fn reset(&mut self) {
        self.processed = 0;
    }
}

/// True when a producer with `min_period` has a real value at bar `index`.
#[inline]
pub fn ready_at(min_period: usize, index: usize) -> bool {
    index + 1 >= min_period
}

/// Indicator protocol.
///
/// Implementations must be `Send + Sync` so that independent engine instances
/// can be moved to worker threads.
pub trait Computation: Send + Sync + fmt::Debug {
    /// Human-readable name (e.g., "sma_14", "smmaosc_15_30").
    fn name(&self) -> &str;

    /// Bars of upstream data required before the first real output.
    fn min_period(&self) -> usize;

    /// Number of upstream lines this computation reads.
    fn input_count(&self) -> usize {
        1
    }

    /// Owned output lines; line 0 is the primary output.
    fn lines(&self) -> &LineSet;

    /// Bars processed since construction or the last reset.
    fn processed(&self) -> usize;

    /// Process the newest bar. Inputs are positioned on it (`value_at(0)`).
    /// Appends exactly one value to every output line.
    fn advance_one(&mut self, inputs: &Inputs<'_>);

    /// Process bars `[start, end)` with full input history available, then
    /// leave every output cursor on `end - 1`.
    ///
    /// `start` must equal `processed()`: ranges continue where the previous
    /// evaluation stopped, so batch preload and live stepping can be mixed.
    fn evaluate_range(&mut self, inputs: &Inputs<'_>, start: usize, end: usize);

    /// Drop all output and running state; back to `Phase::Uninitialized`.
    fn reset(&mut self);

    fn phase(&self) -> Phase {
        Phase::from_counts(self.processed(), self.min_period())
    }

    fn output(&self) -> &Buffer {
        self.lines().line(LineId::PRIMARY)
    }

    /// Primary output `ago` bars before the current one.
    fn value_at(&self, ago: isize) -> f64 {
        self.output().value_at(ago)
    }
}

/// Clamp a requested batch range to what the inputs can serve.
///
/// Returns `None` when there is nothing to compute.
pub(crate) fn batch_bounds(
    processed: usize,
    requested_start: usize,
    end: usize,
    available: usize,
) -> Option<(usize, usize)> {
    debug_assert_eq!(
        requested_start, processed,
        "evaluate_range must continue at the first unprocessed bar"
    );
    let end = end.min(available);
    (processed < end).then_some((processed, end))
}

//! Concrete line computations.
//!
//! Every indicator implements `Computation` from `components::computation`.
//! The single-input averages share `Average<K>` and differ only in their kernel;
//! DEMA, TEMA, the oscillators and the envelope are composites that own their
//! child averages and drive them through the same two entry points.

pub mod average;
pub mod dema;
pub mod ema;
pub mod envelope;
pub mod moving_average;
pub mod oscillator;
pub mod sma;
pub mod smma;
pub mod tema;
pub mod wma;

pub use average::{Average, AverageKernel};
pub use dema::Dema;
pub use ema::{Ema, ExponentialKernel};
pub use envelope::Envelope;
pub use moving_average::{AverageKind, MovingAverage};
pub use oscillator::{AverageOscillator, DualAverageOscillator};
pub use sma::{RollingMean, Sma};
pub use smma::{Smma, SmoothedKernel};
pub use tema::Tema;
pub use wma::{WeightedMean, Wma};

#[cfg(test)]
use crate::components::computation::Computation;
#[cfg(test)]
use crate::lines::{Buffer, Inputs};

/// Drive `computation` one value at a time and return its primary output.
#[cfg(test)]
pub fn run_incremental(computation: &mut dyn Computation, input: &[f64]) -> Vec<f64> {
    let mut buffer = Buffer::with_capacity(input.len());
    for &value in input {
        buffer.append(value);
        let refs = [&buffer];
        computation.advance_one(&Inputs::new(&refs));
    }
    computation.output().as_slice().to_vec()
}

/// Evaluate `computation` over all of `input` in one call.
#[cfg(test)]
pub fn run_batch(computation: &mut dyn Computation, input: &[f64]) -> Vec<f64> {
    let mut buffer = Buffer::with_capacity(input.len());
    for &value in input {
        buffer.append(value);
    }
    let refs = [&buffer];
    computation.evaluate_range(&Inputs::new(&refs), 0, input.len());
    computation.output().as_slice().to_vec()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

//! Smoothed Moving Average (SMMA, Wilder's smoothing).
//!
//! Same recursion as the EMA with alpha = 1 / period, seeded with the SMA of
//! the first `period` values. Min period: period.

use super::average::{Average, AverageKernel};
use super::ema::SeededRecursion;
use crate::error::{check_period, ConfigError};

#[derive(Debug, Clone)]
pub struct SmoothedKernel(SeededRecursion);

impl SmoothedKernel {
    pub fn new(period: usize) -> Self {
        Self(SeededRecursion::new(period, 1.0 / period as f64))
    }
}

impl AverageKernel for SmoothedKernel {
    fn label(&self) -> &'static str {
        "smma"
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

pub type Smma = Average<SmoothedKernel>;

impl Smma {
    pub fn new(period: usize) -> Result<Self, ConfigError> {
        Self::with_input(period, 1)
    }

    pub fn with_input(period: usize, input_min_period: usize) -> Result<Self, ConfigError> {
        let period = check_period("smma", period)?;
        Ok(Average::from_kernel(SmoothedKernel::new(period), input_min_period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::computation::Computation;
    use crate::indicators::{assert_approx, run_batch, run_incremental, DEFAULT_EPSILON};

    #[test]
    fn smma_4_basic() {
        let mut smma = Smma::new(4).unwrap();
        let result = run_incremental(&mut smma, &[2.0, 4.0, 6.0, 8.0, 13.0, 1.0]);
        assert!(result[..3].iter().all(|v| v.is_nan()));
        assert_approx(result[3], 5.0, DEFAULT_EPSILON);
        // 5 + (13 - 5) / 4 = 7
        assert_approx(result[4], 7.0, DEFAULT_EPSILON);
        // 7 + (1 - 7) / 4 = 5.5
        assert_approx(result[5], 5.5, DEFAULT_EPSILON);
        assert_eq!(smma.name(), "smma_4");
    }

    #[test]
    fn smma_is_slower_than_ema() {
        let mut input = vec![10.0; 20];
        input.extend(std::iter::repeat(20.0).take(5));
        let smma = run_incremental(&mut Smma::new(10).unwrap(), &input);
        let ema = run_incremental(&mut crate::indicators::ema::Ema::new(10).unwrap(), &input);
        let last = input.len() - 1;
        assert!(smma[last] < ema[last]);
        assert!(smma[last] > 10.0);
    }

    #[test]
    fn smma_batch_matches_incremental() {
        let input: Vec<f64> = (0..64).map(|i| ((i * 37) % 11) as f64 + 0.125).collect();
        let inc = run_incremental(&mut Smma::new(6).unwrap(), &input);
        let batch = run_batch(&mut Smma::new(6).unwrap(), &input);
        for (a, b) in inc.iter().zip(&batch) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}

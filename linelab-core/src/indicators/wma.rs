//! Weighted Moving Average (WMA).
//!
//! Linear weights 1..=period, the newest value carrying weight `period`,
//! divided by period * (period + 1) / 2. Min period: period.
//!
//! Evaluated relative to the newest value, `x0 + sum(w_k * (x_k - x0)) / W`,
//! so a constant window returns the constant exactly.

use super::average::{Average, AverageKernel};
use crate::error::{check_period, ConfigError};

#[derive(Debug, Clone)]
pub struct WeightedMean {
    period: usize,
    total_weight: f64,
    seen: usize,
}

impl WeightedMean {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            total_weight: (period * (period + 1) / 2) as f64,
            seen: 0,
        }
    }
}

impl AverageKernel for WeightedMean {
    fn label(&self) -> &'static str {
        "wma"
    }

    fn period(&self) -> usize {
        self.period
    }

    fn step<F: Fn(usize) -> f64>(&mut self, back: F) -> f64 {
        self.seen = (self.seen + 1).min(self.period);
        if self.seen < self.period {
            return f64::NAN;
        }
        let newest = back(0);
        let mut acc = 0.0;
        for k in (1..self.period).rev() {
            acc += (back(k) - newest) * (self.period - k) as f64;
        }
        newest + acc / self.total_weight
    }

    fn reset(&mut self) {
        self.seen = 0;
    }
}

pub type Wma = Average<WeightedMean>;

impl Wma {
    pub fn new(period: usize) -> Result<Self, ConfigError> {
        Self::with_input(period, 1)
    }

    pub fn with_input(period: usize, input_min_period: usize) -> Result<Self, ConfigError> {
        let period = check_period("wma", period)?;
        Ok(Average::from_kernel(WeightedMean::new(period), input_min_period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::computation::Computation;
    use crate::indicators::{assert_approx, run_batch, run_incremental, DEFAULT_EPSILON};

    #[test]
    fn wma_3_basic() {
        let mut wma = Wma::new(3).unwrap();
        let result = run_incremental(&mut wma, &[1.0, 2.0, 3.0, 4.0]);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // (1*1 + 2*2 + 3*3) / 6
        assert_approx(result[2], 14.0 / 6.0, DEFAULT_EPSILON);
        // (2*1 + 3*2 + 4*3) / 6
        assert_approx(result[3], 20.0 / 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wma_constant_exact() {
        let mut wma = Wma::new(30).unwrap();
        let result = run_incremental(&mut wma, &[3600.5; 40]);
        for v in &result[29..] {
            assert_eq!(*v, 3600.5);
        }
        let result = run_incremental(&mut Wma::new(6).unwrap(), &[0.1; 20]);
        assert!(result[5..].iter().all(|v| *v == 0.1));
    }

    #[test]
    fn wma_nan_in_window() {
        let mut wma = Wma::new(2).unwrap();
        let result = run_incremental(&mut wma, &[1.0, f64::NAN, 3.0, 5.0]);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_approx(result[3], 13.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wma_batch_matches_incremental() {
        let input: Vec<f64> = (0..50).map(|i| (i as f64).sqrt() * 10.0).collect();
        let inc = run_incremental(&mut Wma::new(8).unwrap(), &input);
        let batch = run_batch(&mut Wma::new(8).unwrap(), &input);
        for (a, b) in inc.iter().zip(&batch) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(Wma::with_input(8, 3).unwrap().min_period(), 10);
    }
}

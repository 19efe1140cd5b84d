//! Parallel period sweep.
//!
//! Each parameter combination gets its own `LineGraph`, so the rayon workers
//! share nothing but the read-only bar slice.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use linelab_core::engine::{EvalMode, LineGraph};
use linelab_core::indicators::AverageKind;
use linelab_core::{Bar, Computation, IndicatorConfig};

/// Sweep specification: one oscillator per period, optionally in dual form
/// against a fixed slow period.
#[derive(Debug, Clone)]
pub struct SweepSpec {
    pub average: AverageKind,
    pub periods: Vec<usize>,
    pub slow: Option<usize>,
    pub mode: EvalMode,
}

impl SweepSpec {
    fn config_for(&self, period: usize) -> IndicatorConfig {
        match self.slow {
            Some(slow) => IndicatorConfig::dual_oscillator(self.average, period as i64, slow as i64),
            None => IndicatorConfig::oscillator(self.average, period as i64),
        }
    }
}

/// Summary statistics of one oscillator run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub indicator: String,
    pub period: usize,
    pub min_period: usize,
    pub ready_bars: usize,
    pub last: f64,
    pub mean: f64,
    /// Sign changes of the oscillator over the ready region.
    pub crossings: usize,
}

fn run_one(spec: &SweepSpec, period: usize, bars: &[Bar]) -> Result<SweepRow> {
    let mut graph = LineGraph::new();
    let close = graph.feed_line("close")?;
    let node = graph.add(&spec.config_for(period), &[close])?;
    match spec.mode {
        EvalMode::Incremental => {
            for bar in bars {
                graph.push_bar(bar)?;
            }
        }
        EvalMode::Batch => {
            graph.load(bars)?;
            graph.run_batch()?;
        }
    }

    let computation = graph
        .computation(node)
        .context("sweep node missing from graph")?;
    let ready: Vec<f64> = computation
        .output()
        .as_slice()
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    let mean = if ready.is_empty() {
        f64::NAN
    } else {
        ready.iter().sum::<f64>() / ready.len() as f64
    };
    let crossings = ready
        .windows(2)
        .filter(|w| (w[0] < 0.0 && w[1] >= 0.0) || (w[0] >= 0.0 && w[1] < 0.0))
        .count();

    Ok(SweepRow {
        indicator: computation.name().to_string(),
        period,
        min_period: computation.min_period(),
        ready_bars: ready.len(),
        last: computation.value_at(0),
        mean,
        crossings,
    })
}

/// Run every period of `spec` over `bars` in parallel. Rows keep the order of
/// `spec.periods`.
pub fn run_sweep(spec: &SweepSpec, bars: &[Bar]) -> Result<Vec<SweepRow>> {
    let rows = spec
        .periods
        .par_iter()
        .map(|&period| run_one(spec, period, bars))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(
        average = %spec.average,
        runs = rows.len(),
        bars = bars.len(),
        "sweep complete"
    );
    Ok(rows)
}

pub fn export_sweep_csv(rows: &[SweepRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use linelab_core::data::synthetic_bars;

    fn spec(slow: Option<usize>, mode: EvalMode) -> SweepSpec {
        SweepSpec {
            average: AverageKind::Ema,
            periods: vec![5, 10, 20, 40],
            slow,
            mode,
        }
    }

    #[test]
    fn rows_follow_period_order() {
        let bars = synthetic_bars(200, 4);
        let rows = run_sweep(&spec(None, EvalMode::Incremental), &bars).unwrap();
        let periods: Vec<usize> = rows.iter().map(|r| r.period).collect();
        assert_eq!(periods, vec![5, 10, 20, 40]);
        for row in &rows {
            assert_eq!(row.min_period, row.period);
            assert_eq!(row.ready_bars, 200 - row.period + 1);
            assert!(row.last.is_finite());
        }
        assert_eq!(rows[0].indicator, "emaosc_5");
    }

    #[test]
    fn modes_give_identical_rows() {
        let bars = synthetic_bars(150, 8);
        let inc = run_sweep(&spec(Some(30), EvalMode::Incremental), &bars).unwrap();
        let batch = run_sweep(&spec(Some(30), EvalMode::Batch), &bars).unwrap();
        assert_eq!(inc.len(), batch.len());
        for (a, b) in inc.iter().zip(&batch) {
            assert_eq!(a.last.to_bits(), b.last.to_bits());
            assert_eq!(a.crossings, b.crossings);
            assert_eq!(a.min_period, b.min_period);
        }
        assert_eq!(inc[3].min_period, 40);
    }

    #[test]
    fn invalid_period_is_an_error() {
        let bars = synthetic_bars(20, 1);
        let mut bad = spec(None, EvalMode::Batch);
        bad.periods = vec![3, 0];
        assert!(run_sweep(&bad, &bars).is_err());
    }

    #[test]
    fn csv_has_header() {
        let bars = synthetic_bars(60, 2);
        let rows = run_sweep(&spec(None, EvalMode::Batch), &bars).unwrap();
        let csv = export_sweep_csv(&rows).unwrap();
        assert!(csv.starts_with("indicator,period,min_period,ready_bars,last,mean,crossings"));
        assert_eq!(csv.lines().count(), 5);
    }
}

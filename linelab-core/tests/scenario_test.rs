//! End-to-end scenario: a 255-bar daily history through every oscillator family
//! at the default periods, checked against straightforward reference formulas.
//!
//! The reference implementations below use the textbook recurrences
//! (`alpha * x + (1 - alpha) * prev`, explicit window sums) and are compared
//! with a tolerance, while the two evaluation modes are compared bit for bit.

use linelab_core::data::synthetic_bars;
use linelab_core::engine::{EngineConfig, EvalMode, LineGraph};
use linelab_core::indicators::oscillator::{DEFAULT_FAST, DEFAULT_PERIOD, DEFAULT_SLOW};
use linelab_core::indicators::AverageKind;
use linelab_core::{Bar, Computation, IndicatorConfig, NodeId};

const BARS: usize = 255;
const SEED: u64 = 2006;

fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

// ── Reference formulas ───────────────────────────────────────────────

fn ref_sma(x: &[f64], p: usize) -> Vec<f64> {
    (0..x.len())
        .map(|i| {
            if i + 1 < p {
                f64::NAN
            } else {
                x[i + 1 - p..=i].iter().sum::<f64>() / p as f64
            }
        })
        .collect()
}

fn ref_wma(x: &[f64], p: usize) -> Vec<f64> {
    let total = (p * (p + 1) / 2) as f64;
    (0..x.len())
        .map(|i| {
            if i + 1 < p {
                f64::NAN
            } else {
                x[i + 1 - p..=i]
                    .iter()
                    .enumerate()
                    .map(|(w, v)| v * (w + 1) as f64)
                    .sum::<f64>()
                    / total
            }
        })
        .collect()
}

/// Seeded recursion over `x`, skipping its leading NaNs.
fn ref_recursive(x: &[f64], p: usize, alpha: f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; x.len()];
    let Some(start) = x.iter().position(|v| !v.is_nan()) else {
        return out;
    };
    if start + p > x.len() {
        return out;
    }
    let seed_end = start + p - 1;
    let mut prev = x[start..=seed_end].iter().sum::<f64>() / p as f64;
    out[seed_end] = prev;
    for i in seed_end + 1..x.len() {
        prev = alpha * x[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}

fn ref_ema(x: &[f64], p: usize) -> Vec<f64> {
    ref_recursive(x, p, 2.0 / (p as f64 + 1.0))
}

fn ref_average(kind: AverageKind, x: &[f64], p: usize) -> Vec<f64> {
    match kind {
        AverageKind::Sma => ref_sma(x, p),
        AverageKind::Wma => ref_wma(x, p),
        AverageKind::Ema => ref_ema(x, p),
        AverageKind::Smma => ref_recursive(x, p, 1.0 / p as f64),
        AverageKind::Dema => {
            let e1 = ref_ema(x, p);
            let e2 = ref_ema(&e1, p);
            e1.iter().zip(&e2).map(|(a, b)| 2.0 * a - b).collect()
        }
        AverageKind::Tema => {
            let e1 = ref_ema(x, p);
            let e2 = ref_ema(&e1, p);
            let e3 = ref_ema(&e2, p);
            (0..x.len())
                .map(|i| 3.0 * e1[i] - 3.0 * e2[i] + e3[i])
                .collect()
        }
    }
}

fn assert_close(actual: &[f64], expected: &[f64], label: &str) {
    assert_eq!(actual.len(), expected.len(), "{label}: length");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() {
            assert!(a.is_nan(), "{label}: expected NaN at {i}, got {a}");
            continue;
        }
        let tol = 1e-9 * e.abs().max(1.0);
        assert!((a - e).abs() <= tol, "{label}: bar {i} actual={a} expected={e}");
    }
}

// ── Scenario ─────────────────────────────────────────────────────────

fn wire_all(graph: &mut LineGraph) -> Vec<(String, NodeId, IndicatorConfig)> {
    let close = graph.feed_line("close").unwrap();
    let mut nodes = Vec::new();
    for kind in AverageKind::ALL {
        let single = IndicatorConfig::oscillator(kind, DEFAULT_PERIOD as i64);
        nodes.push((format!("{kind} single"), graph.add(&single, &[close]).unwrap(), single));
        let dual = IndicatorConfig::dual_oscillator(kind, DEFAULT_FAST as i64, DEFAULT_SLOW as i64);
        nodes.push((format!("{kind} dual"), graph.add(&dual, &[close]).unwrap(), dual));
    }
    nodes
}

#[test]
fn default_periods_match_reference_formulas() {
    let bars = synthetic_bars(BARS, SEED);
    let price = closes(&bars);
    let mut graph = LineGraph::new();
    let nodes = wire_all(&mut graph);
    for bar in &bars {
        graph.push_bar(bar).unwrap();
    }

    for (label, id, config) in &nodes {
        let out = graph.computation(*id).unwrap().output().as_slice();
        let expected: Vec<f64> = match *config {
            IndicatorConfig::Oscillator { average, period } => {
                let avg = ref_average(average, &price, period as usize);
                price.iter().zip(&avg).map(|(p, a)| p - a).collect()
            }
            IndicatorConfig::DualOscillator { average, fast, slow } => {
                let f = ref_average(average, &price, fast as usize);
                let s = ref_average(average, &price, slow as usize);
                f.iter().zip(&s).map(|(a, b)| a - b).collect()
            }
            _ => unreachable!(),
        };
        assert_close(out, &expected, label);
    }
}

#[test]
fn default_min_periods() {
    let mut graph = LineGraph::new();
    let nodes = wire_all(&mut graph);
    let periods: Vec<usize> = nodes
        .iter()
        .map(|(_, id, _)| graph.min_period(*id).unwrap())
        .collect();
    // single 30 / dual 12-26 for sma, ema, wma, smma, dema, tema
    assert_eq!(periods, vec![30, 26, 30, 26, 30, 26, 30, 26, 59, 51, 88, 76]);
    assert_eq!(graph.warmup(), 88);
}

#[test]
fn documented_min_periods() {
    assert_eq!(
        IndicatorConfig::oscillator(AverageKind::Sma, 14).build(&[1]).unwrap().min_period(),
        14
    );
    assert_eq!(
        IndicatorConfig::oscillator(AverageKind::Ema, 14).build(&[1]).unwrap().min_period(),
        14
    );
    assert_eq!(
        IndicatorConfig::dual_oscillator(AverageKind::Smma, 15, 30)
            .build(&[1])
            .unwrap()
            .min_period(),
        30
    );
}

#[test]
fn ema_oscillator_first_value_is_price_minus_seed_mean() {
    let bars = synthetic_bars(BARS, SEED);
    let price = closes(&bars);
    let mut graph = LineGraph::new();
    let close = graph.feed_line("close").unwrap();
    let osc = graph
        .add(&IndicatorConfig::oscillator(AverageKind::Ema, 14), &[close])
        .unwrap();
    for bar in &bars[..14] {
        graph.push_bar(bar).unwrap();
    }
    let mean = price[..14].iter().sum::<f64>() / 14.0;
    let first = graph.value_at(osc, 0);
    assert!((first - (price[13] - mean)).abs() < 1e-9);
    assert!(graph.value_at(osc, -1).is_nan());
}

#[test]
fn incremental_and_batch_runs_are_bit_identical() {
    let bars = synthetic_bars(BARS, SEED);

    let mut inc = LineGraph::new();
    let nodes = wire_all(&mut inc);
    for bar in &bars {
        inc.push_bar(bar).unwrap();
    }

    let mut batch = LineGraph::new();
    wire_all(&mut batch);
    batch.load(&bars).unwrap();
    batch.run_batch().unwrap();

    for (label, id, _) in &nodes {
        let a = inc.computation(*id).unwrap().output().as_slice();
        let b = batch.computation(*id).unwrap().output().as_slice();
        assert_eq!(a.len(), BARS, "{label}");
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert_eq!(x.to_bits(), y.to_bits(), "{label} at bar {i}");
        }
        // Every family is ready well before the end of the history.
        assert!(a[BARS - 1].is_finite(), "{label}");
    }
}

#[test]
fn batch_preload_then_live_stepping() {
    let bars = synthetic_bars(BARS, SEED);
    let (preload, live) = bars.split_at(200);

    let mut pure = LineGraph::new();
    let nodes = wire_all(&mut pure);
    for bar in &bars {
        pure.push_bar(bar).unwrap();
    }

    let mut mixed = LineGraph::new();
    wire_all(&mut mixed);
    mixed.load(preload).unwrap();
    mixed.run_batch().unwrap();
    for bar in live {
        mixed.push_bar(bar).unwrap();
    }

    for (label, id, _) in &nodes {
        for ago in 0..BARS as isize {
            let a = pure.value_at(*id, -ago);
            let b = mixed.value_at(*id, -ago);
            assert_eq!(a.to_bits(), b.to_bits(), "{label} ago={ago}");
        }
    }
}

#[test]
fn config_file_run_matches_programmatic_wiring() {
    let toml = r#"
mode = "batch"

[[indicators]]
name = "smma_dual"
indicator = { kind = "dual_oscillator", average = "smma" }

[[indicators]]
name = "tema_single"
indicator = { kind = "oscillator", average = "tema" }
"#;
    let bars = synthetic_bars(BARS, SEED);
    let config = EngineConfig::from_toml(toml).unwrap();
    assert_eq!(config.mode, EvalMode::Batch);
    let (from_file, named) = config.run(&bars).unwrap();

    let mut manual = LineGraph::new();
    let close = manual.feed_line("close").unwrap();
    let dual = manual
        .add(&IndicatorConfig::dual_oscillator(AverageKind::Smma, 12, 26), &[close])
        .unwrap();
    let single = manual
        .add(&IndicatorConfig::oscillator(AverageKind::Tema, 30), &[close])
        .unwrap();
    for bar in &bars {
        manual.push_bar(bar).unwrap();
    }

    assert_eq!(named[0].0, "smma_dual");
    for (file_id, manual_id) in [(named[0].1, dual), (named[1].1, single)] {
        let a = from_file.computation(file_id).unwrap().output().as_slice();
        let b = manual.computation(manual_id).unwrap().output().as_slice();
        for (x, y) in a.iter().zip(b) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}

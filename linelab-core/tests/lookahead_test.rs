//! Look-ahead contamination tests for every indicator family.
//!
//! Invariant: no value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: evaluate on a truncated history (bars 0..100) and the full history
//! (bars 0..200), in both evaluation modes. Bars 0..100 must be identical
//! between the runs. Any difference means future data leaked into past values.

use linelab_core::data::synthetic_bars;
use linelab_core::domain::Bar;
use linelab_core::engine::LineGraph;
use linelab_core::indicators::AverageKind;
use linelab_core::{Computation, IndicatorConfig};

fn all_configs() -> Vec<IndicatorConfig> {
    let mut configs = Vec::new();
    for kind in AverageKind::ALL {
        configs.push(IndicatorConfig::average(kind, 10));
        configs.push(IndicatorConfig::oscillator(kind, 10));
        configs.push(IndicatorConfig::dual_oscillator(kind, 5, 12));
        configs.push(IndicatorConfig::envelope(kind, 10, 2.5));
    }
    configs
}

/// Evaluate `config` over `bars` and return every output line.
fn evaluate(config: &IndicatorConfig, bars: &[Bar], batch: bool) -> Vec<Vec<f64>> {
    let mut graph = LineGraph::new();
    let close = graph.feed_line("close").unwrap();
    let node = graph.add(config, &[close]).unwrap();
    if batch {
        graph.load(bars).unwrap();
        graph.run_batch().unwrap();
    } else {
        for bar in bars {
            graph.push_bar(bar).unwrap();
        }
    }
    graph
        .computation(node)
        .unwrap()
        .lines()
        .iter()
        .map(|(_, b)| b.as_slice().to_vec())
        .collect()
}

fn assert_no_lookahead(config: &IndicatorConfig, full_bars: &[Bar], truncated_len: usize, batch: bool) {
    let full = evaluate(config, full_bars, batch);
    let truncated = evaluate(config, &full_bars[..truncated_len], batch);

    for (line, (t_line, f_line)) in truncated.iter().zip(&full).enumerate() {
        assert_eq!(t_line.len(), truncated_len, "{config:?}: truncated length");
        assert_eq!(f_line.len(), full_bars.len(), "{config:?}: full length");
        for i in 0..truncated_len {
            let (t, f) = (t_line[i], f_line[i]);
            assert!(
                t.to_bits() == f.to_bits(),
                "{config:?} line {line}: look-ahead at bar {i} (truncated={t}, full={f})"
            );
        }
    }
}

#[test]
fn no_lookahead_incremental() {
    let bars = synthetic_bars(200, 42);
    for config in all_configs() {
        assert_no_lookahead(&config, &bars, 100, false);
    }
}

#[test]
fn no_lookahead_batch() {
    let bars = synthetic_bars(200, 42);
    for config in all_configs() {
        assert_no_lookahead(&config, &bars, 100, true);
    }
}

#[test]
fn spike_after_cutoff_does_not_move_history() {
    let mut bars = synthetic_bars(150, 5);
    let baseline = evaluate(&IndicatorConfig::oscillator(AverageKind::Tema, 7), &bars, false);
    for bar in &mut bars[120..] {
        bar.close *= 10.0;
        bar.high = bar.high.max(bar.close);
    }
    let spiked = evaluate(&IndicatorConfig::oscillator(AverageKind::Tema, 7), &bars, false);
    for i in 0..120 {
        assert_eq!(baseline[0][i].to_bits(), spiked[0][i].to_bits(), "bar {i}");
    }
    assert_ne!(baseline[0][149].to_bits(), spiked[0][149].to_bits());
}

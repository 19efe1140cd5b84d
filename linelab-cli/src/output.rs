//! Rendering of graph outputs: CSV export and a plain-text summary.

use anyhow::{Context, Result};

use linelab_core::components::ready_at;
use linelab_core::engine::LineGraph;
use linelab_core::{Computation, NodeId};

/// Column header for one output line: `name` for single-line indicators,
/// `name.line` otherwise.
fn column_names(graph: &LineGraph, nodes: &[(String, NodeId)]) -> Vec<String> {
    let mut columns = Vec::new();
    for (name, id) in nodes {
        let Some(computation) = graph.computation(*id) else {
            continue;
        };
        let lines = computation.lines();
        if lines.len() == 1 {
            columns.push(name.clone());
        } else {
            for (line_id, _) in lines.iter() {
                let line = lines
                    .name_of(line_id)
                    .map(str::to_string)
                    .unwrap_or_else(|| line_id.0.to_string());
                columns.push(format!("{name}.{line}"));
            }
        }
    }
    columns
}

/// Export the close and every output line as CSV, one row per bar.
///
/// With `skip_warmup`, rows before `graph.warmup()` bars are dropped. NaN is
/// written as an empty field.
pub fn export_lines_csv(graph: &LineGraph, nodes: &[(String, NodeId)], skip_warmup: bool) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let mut header = vec!["datetime".to_string(), "close".to_string()];
    header.extend(column_names(graph, nodes));
    wtr.write_record(&header)?;

    let warmup = if skip_warmup { graph.warmup() } else { 0 };
    let feed = graph.feed();
    for (i, dt) in feed.datetimes().iter().enumerate() {
        if !ready_at(warmup, i) {
            continue;
        }
        let mut record = vec![
            dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", feed.close().get(i)),
        ];
        for (_, id) in nodes {
            let Some(computation) = graph.computation(*id) else {
                continue;
            };
            for (_, buffer) in computation.lines().iter() {
                let v = buffer.get(i);
                record.push(if v.is_nan() {
                    String::new()
                } else {
                    format!("{v:.6}")
                });
            }
        }
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn print_summary(graph: &LineGraph, nodes: &[(String, NodeId)]) {
    println!();
    println!("=== Run Summary ===");
    println!("Bars:           {}", graph.len());
    println!("Warm-up:        {} bars", graph.warmup());
    println!();
    println!("{:<20} {:<20} {:>10} {:>16}", "Name", "Indicator", "MinPeriod", "Last");
    println!("{}", "-".repeat(69));
    for (name, id) in nodes {
        let Some(computation) = graph.computation(*id) else {
            continue;
        };
        let last = computation.value_at(0);
        let last = if last.is_nan() {
            "n/a".to_string()
        } else {
            format!("{last:.6}")
        };
        println!(
            "{:<20} {:<20} {:>10} {:>16}",
            name,
            computation.name(),
            computation.min_period(),
            last
        );
    }
    println!();
}

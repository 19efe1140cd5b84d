//! TOML description of a graph: evaluation mode plus a list of named indicators.
//!
//! ```toml
//! mode = "batch"
//!
//! [[indicators]]
//! name = "trend"
//! input = "close"
//! indicator = { kind = "average", average = "ema", period = 20 }
//!
//! [[indicators]]
//! name = "trend_osc"
//! input = "trend"
//! indicator = { kind = "oscillator", average = "sma", period = 5 }
//! ```
//!
//! `input` names a feed line, an earlier indicator (its primary line) or a
//! specific line of an earlier indicator as `name.line`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::graph::LineGraph;
use crate::components::factory::IndicatorConfig;
use crate::domain::Bar;
use crate::error::{ConfigError, GraphError};
use crate::lines::{LineId, NodeId, SeriesSource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalMode {
    /// One `push_bar` per bar.
    #[default]
    Incremental,
    /// Load everything, then one `evaluate_range` per node.
    Batch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub name: String,
    #[serde(default = "default_input")]
    pub input: String,
    pub indicator: IndicatorConfig,
}

fn default_input() -> String {
    "close".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub mode: EvalMode,
    #[serde(default)]
    pub indicators: Vec<IndicatorEntry>,
}

impl EngineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        debug!(
            mode = ?config.mode,
            indicators = config.indicators.len(),
            "parsed engine config"
        );
        Ok(config)
    }

    /// Wire every entry into a fresh graph, in file order.
    pub fn build_graph(&self) -> Result<(LineGraph, Vec<(String, NodeId)>), ConfigError> {
        let mut graph = LineGraph::new();
        let mut by_name: HashMap<&str, NodeId> = HashMap::new();
        let mut nodes = Vec::with_capacity(self.indicators.len());

        for entry in &self.indicators {
            if by_name.contains_key(entry.name.as_str()) {
                return Err(ConfigError::DuplicateName(entry.name.clone()));
            }
            let source = resolve_input(&graph, &by_name, &entry.input)?;
            let id = graph.add(&entry.indicator, &[source])?;
            by_name.insert(entry.name.as_str(), id);
            nodes.push((entry.name.clone(), id));
        }
        Ok((graph, nodes))
    }

    /// Build the graph and drive `bars` through it in the configured mode.
    pub fn run(&self, bars: &[Bar]) -> Result<(LineGraph, Vec<(String, NodeId)>), GraphError> {
        let (mut graph, nodes) = self.build_graph()?;
        match self.mode {
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
        Ok((graph, nodes))
    }
}

fn resolve_input(
    graph: &LineGraph,
    by_name: &HashMap<&str, NodeId>,
    input: &str,
) -> Result<SeriesSource, ConfigError> {
    let (head, line) = match input.split_once('.') {
        Some((head, line)) => (head, Some(line)),
        None => (input, None),
    };
    match (by_name.get(head), line) {
        (Some(&id), Some(line)) => graph.output(id, line),
        (Some(&id), None) => Ok(SeriesSource::node(id, LineId::PRIMARY)),
        (None, _) => graph.feed_line(input),
    }
}

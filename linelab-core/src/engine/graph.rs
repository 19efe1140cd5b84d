//! Arena-owned graph of line computations driven by a data feed.
//!
//! Nodes are stored in insertion order. A node may only read the feed or nodes
//! added before it, so insertion order is a topological order and one pass over
//! the arena per bar is enough.

use tracing::{debug, info};

use crate::components::computation::Computation;
use crate::components::factory::IndicatorConfig;
use crate::data::DataFeed;
use crate::domain::Bar;
use crate::error::{ConfigError, GraphError};
use crate::lines::{Buffer, Inputs, NodeId, Producer, SeriesSource};

#[derive(Debug)]
struct Node {
    computation: Box<dyn Computation>,
    inputs: Vec<SeriesSource>,
}

/// Owns the data feed and every computation wired to it.
#[derive(Debug, Default)]
pub struct LineGraph {
    feed: DataFeed,
    nodes: Vec<Node>,
    stopped: bool,
}

/// Collect the input buffers of one node. Sources were validated at wiring
/// time and only point at the feed or at earlier nodes.
fn gather<'a>(feed: &'a DataFeed, upstream: &'a [Node], inputs: &[SeriesSource]) -> Vec<&'a Buffer> {
    inputs
        .iter()
        .map(|source| match source.producer {
            Producer::Feed => feed.lines().line(source.line),
            Producer::Node(id) => upstream[id.0].computation.lines().line(source.line),
        })
        .collect()
}

impl LineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&self) -> &DataFeed {
        &self.feed
    }

    /// Number of bars in the feed.
    pub fn len(&self) -> usize {
        self.feed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    // ─── Wiring ──────────────────────────────────────────────────────

    /// Source for a feed line by name (`"close"`, `"volume"`, ...).
    pub fn feed_line(&self, name: &str) -> Result<SeriesSource, ConfigError> {
        self.feed
            .lines()
            .id_of(name)
            .map(SeriesSource::feed)
            .ok_or_else(|| ConfigError::UnknownLine(name.to_string()))
    }

    /// Source for a named output line of an existing node.
    pub fn output(&self, node: NodeId, line: &str) -> Result<SeriesSource, ConfigError> {
        let computation = self.computation(node).ok_or(ConfigError::UnknownNode(node.0))?;
        computation
            .lines()
            .id_of(line)
            .map(|id| SeriesSource::node(node, id))
            .ok_or_else(|| ConfigError::UnknownLine(format!("{}.{line}", computation.name())))
    }

    /// Resolve a source to its buffer.
    pub fn line(&self, source: SeriesSource) -> Result<&Buffer, ConfigError> {
        match source.producer {
            Producer::Feed => self
                .feed
                .lines()
                .get(source.line)
                .ok_or_else(|| ConfigError::UnknownLine(format!("feed line #{}", source.line.0))),
            Producer::Node(id) => {
                let computation = self.computation(id).ok_or(ConfigError::UnknownNode(id.0))?;
                computation.lines().get(source.line).ok_or_else(|| {
                    ConfigError::UnknownLine(format!("{}#{}", computation.name(), source.line.0))
                })
            }
        }
    }

    fn source_min_period(&self, source: SeriesSource) -> usize {
        match source.producer {
            Producer::Feed => 1,
            Producer::Node(id) => self.min_period(id).unwrap_or(1),
        }
    }

    /// Build the computation described by `config` and wire it to `inputs`.
    pub fn add(
        &mut self,
        config: &IndicatorConfig,
        inputs: &[SeriesSource],
    ) -> Result<NodeId, ConfigError> {
        for source in inputs {
            self.line(*source)?;
        }
        let min_periods: Vec<usize> = inputs.iter().map(|s| self.source_min_period(*s)).collect();
        let computation = config.build(&min_periods)?;
        self.add_computation(computation, inputs)
    }

    /// Wire an already constructed computation.
    ///
    /// Its `min_period` must cover the slowest input; build chained averages
    /// with `with_input` so the upstream warm-up is counted.
    ///
    /// The computation is reset, then caught up over any history already in
    /// the feed so that late wiring yields the same values as early wiring.
    pub fn add_computation(
        &mut self,
        mut computation: Box<dyn Computation>,
        inputs: &[SeriesSource],
    ) -> Result<NodeId, ConfigError> {
        if inputs.len() != computation.input_count() {
            return Err(ConfigError::InputCount {
                indicator: computation.name().to_string(),
                expected: computation.input_count(),
                actual: inputs.len(),
            });
        }
        let required = inputs
            .iter()
            .map(|s| self.source_min_period(*s))
            .max()
            .unwrap_or(1);
        if computation.min_period() < required {
            return Err(ConfigError::MinPeriodBelowInputs {
                indicator: computation.name().to_string(),
                min_period: computation.min_period(),
                required,
            });
        }
        let buffers = inputs
            .iter()
            .map(|s| self.line(*s))
            .collect::<Result<Vec<_>, _>>()?;
        let lengths: Vec<usize> = buffers.iter().map(|b| b.len()).collect();
        if lengths.windows(2).any(|w| w[0] != w[1]) {
            return Err(ConfigError::MismatchedInputs { lengths });
        }

        computation.reset();
        let history = lengths.first().copied().unwrap_or(0);
        if history > 0 {
            computation.evaluate_range(&Inputs::new(&buffers), 0, history);
        }

        let id = NodeId(self.nodes.len());
        debug!(
            node = %id,
            name = computation.name(),
            min_period = computation.min_period(),
            inputs = ?inputs,
            history,
            "wired computation"
        );
        self.nodes.push(Node {
            computation,
            inputs: inputs.to_vec(),
        });
        Ok(id)
    }

    // ─── Driving ─────────────────────────────────────────────────────

    /// Append one bar and advance every node by one step.
    ///
    /// Nodes left behind by `load` are first caught up in batch.
    pub fn push_bar(&mut self, bar: &Bar) -> Result<(), GraphError> {
        if self.stopped {
            return Err(GraphError::Stopped);
        }
        self.feed.push_bar(bar);
        let previous = self.feed.len() - 1;

        for idx in 0..self.nodes.len() {
            let (upstream, rest) = self.nodes.split_at_mut(idx);
            let node = &mut rest[0];
            let buffers = gather(&self.feed, upstream, &node.inputs);
            let inputs = Inputs::new(&buffers);
            let processed = node.computation.processed();
            if processed < previous {
                node.computation.evaluate_range(&inputs, processed, previous);
            }
            node.computation.advance_one(&inputs);
        }
        Ok(())
    }

    /// Append bars to the feed without evaluating any node.
    pub fn load(&mut self, bars: &[Bar]) -> Result<(), GraphError> {
        if self.stopped {
            return Err(GraphError::Stopped);
        }
        for bar in bars {
            self.feed.push_bar(bar);
        }
        debug!(bars = bars.len(), total = self.feed.len(), "loaded bars");
        Ok(())
    }

    /// Evaluate every node over its unprocessed range in one call per node.
    pub fn run_batch(&mut self) -> Result<(), GraphError> {
        if self.stopped {
            return Err(GraphError::Stopped);
        }
        let end = self.feed.len();
        for idx in 0..self.nodes.len() {
            let (upstream, rest) = self.nodes.split_at_mut(idx);
            let node = &mut rest[0];
            let buffers = gather(&self.feed, upstream, &node.inputs);
            let start = node.computation.processed();
            node.computation
                .evaluate_range(&Inputs::new(&buffers), start, end);
        }
        info!(nodes = self.nodes.len(), bars = end, "batch evaluation complete");
        Ok(())
    }

    /// Clear the feed and return every node to `Uninitialized`.
    pub fn start(&mut self) {
        self.feed.reset();
        for node in &mut self.nodes {
            node.computation.reset();
        }
        self.stopped = false;
        info!(nodes = self.nodes.len(), "graph started");
    }

    /// Refuse further evaluation until the next `start`.
    pub fn stop(&mut self) {
        self.stopped = true;
        info!(bars = self.feed.len(), "graph stopped");
    }

    // ─── Queries ─────────────────────────────────────────────────────

    pub fn computation(&self, node: NodeId) -> Option<&dyn Computation> {
        self.nodes.get(node.0).map(|n| n.computation.as_ref())
    }

    /// Primary output of `node`, `ago` bars back. NaN for unknown nodes.
    pub fn value_at(&self, node: NodeId, ago: isize) -> f64 {
        self.computation(node)
            .map_or(f64::NAN, |c| c.value_at(ago))
    }

    pub fn min_period(&self, node: NodeId) -> Option<usize> {
        self.computation(node).map(|c| c.min_period())
    }

    /// Bars needed before every node is ready.
    pub fn warmup(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.computation.min_period())
            .max()
            .unwrap_or(0)
    }
}

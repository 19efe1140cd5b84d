//! Series sources: handles that bind a consumer to one producer line.
//!
//! A `SeriesSource` never owns storage. The graph resolves it into a
//! `&Buffer` borrow right before evaluation, and hands the borrows to the
//! computation as `Inputs`.

use serde::{Deserialize, Serialize};

use super::buffer::Buffer;
use super::line_set::LineId;

/// Index of a computation inside a `LineGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Who produces the line a source points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Producer {
    /// The graph's raw data feed.
    Feed,
    /// Output of another computation in the same graph.
    Node(NodeId),
}

/// Read-only binding to one line of a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesSource {
    pub producer: Producer,
    pub line: LineId,
}

impl SeriesSource {
    pub fn feed(line: LineId) -> Self {
        Self {
            producer: Producer::Feed,
            line,
        }
    }

    pub fn node(node: NodeId, line: LineId) -> Self {
        Self {
            producer: Producer::Node(node),
            line,
        }
    }
}

/// Resolved upstream buffers handed to a computation for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    lines: &'a [&'a Buffer],
}

impl<'a> Inputs<'a> {
    pub fn new(lines: &'a [&'a Buffer]) -> Self {
        Self { lines }
    }

    /// Input line `i`.
    ///
    /// # Panics
    /// If fewer than `i + 1` inputs were bound; the graph checks input counts
    /// at wiring time.
    pub fn line(&self, i: usize) -> &'a Buffer {
        self.lines[i]
    }

    /// Length shared by the bound inputs (shortest line).
    pub fn size(&self) -> usize {
        self.lines.iter().map(|b| b.len()).min().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

use super::graph::LineGraph;

/// Counts bars until every node of a graph is ready.
#[derive(Debug, Clone)]
pub struct WarmupState {
    warmup_bars: usize,
    bars_processed: usize,
}

impl WarmupState {
    pub fn new(warmup_bars: usize) -> Self {
        Self {
            warmup_bars,
            bars_processed: 0,
        }
    }

    /// Warm-up from a set of min periods (the largest one wins).
    pub fn from_min_periods(min_periods: impl IntoIterator<Item = usize>) -> Self {
        Self::new(min_periods.into_iter().max().unwrap_or(0))
    }

    pub fn for_graph(graph: &LineGraph) -> Self {
        Self::new(graph.warmup())
    }

    pub fn process_bar(&mut self) {
        self.bars_processed += 1;
    }

    pub fn is_warm(&self) -> bool {
        self.bars_processed >= self.warmup_bars
    }

    pub fn bars_until_warm(&self) -> usize {
        self.warmup_bars.saturating_sub(self.bars_processed)
    }

    pub fn reset(&mut self) {
        self.bars_processed = 0;
    }
}

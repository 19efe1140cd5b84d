//! DataFeed: the raw-input line set written by feed adapters.
//!
//! `push_bar` is the only write path. Bars must arrive in chronological order,
//! once each; the feed performs no ordering or deduplication.

use chrono::NaiveDateTime;

use crate::domain::Bar;
use crate::lines::{Buffer, LineId, LineSet};

/// Line order of every feed: datetime first, then OHLCV and open interest.
pub const FEED_LINES: [&str; 7] = [
    "datetime",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "openinterest",
];

#[derive(Debug, Clone)]
pub struct DataFeed {
    lines: LineSet,
    datetimes: Vec<NaiveDateTime>,
}

impl Default for DataFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFeed {
    pub const DATETIME: LineId = LineId(0);
    pub const OPEN: LineId = LineId(1);
    pub const HIGH: LineId = LineId(2);
    pub const LOW: LineId = LineId(3);
    pub const CLOSE: LineId = LineId(4);
    pub const VOLUME: LineId = LineId(5);
    pub const OPEN_INTEREST: LineId = LineId(6);

    pub fn new() -> Self {
        Self {
            lines: LineSet::with_names(&FEED_LINES),
            datetimes: Vec::new(),
        }
    }

    /// Append one bar to every line. The datetime line stores Unix seconds.
    pub fn push_bar(&mut self, bar: &Bar) {
        let ts = bar.datetime.and_utc().timestamp() as f64;
        self.lines.line_mut(Self::DATETIME).append(ts);
        self.lines.line_mut(Self::OPEN).append(bar.open);
        self.lines.line_mut(Self::HIGH).append(bar.high);
        self.lines.line_mut(Self::LOW).append(bar.low);
        self.lines.line_mut(Self::CLOSE).append(bar.close);
        self.lines.line_mut(Self::VOLUME).append(bar.volume);
        self.lines.line_mut(Self::OPEN_INTEREST).append(bar.open_interest);
        self.datetimes.push(bar.datetime);
    }

    /// Datetime of the bar `ago` bars before the newest one.
    pub fn datetime(&self, ago: isize) -> Option<NaiveDateTime> {
        if ago > 0 {
            return None;
        }
        let back = ago.unsigned_abs();
        let len = self.datetimes.len();
        if back >= len {
            return None;
        }
        Some(self.datetimes[len - 1 - back])
    }

    pub fn datetimes(&self) -> &[NaiveDateTime] {
        &self.datetimes
    }

    pub fn lines(&self) -> &LineSet {
        &self.lines
    }

    pub fn line(&self, name: &str) -> Option<&Buffer> {
        self.lines.by_name(name)
    }

    pub fn close(&self) -> &Buffer {
        self.lines.line(Self::CLOSE)
    }

    pub fn len(&self) -> usize {
        self.datetimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datetimes.is_empty()
    }

    pub fn reset(&mut self) {
        self.lines.reset();
        self.datetimes.clear();
    }
}

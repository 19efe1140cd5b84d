//! Raw market data: the feed line set and synthetic fixtures.

pub mod feed;
pub mod synthetic;

pub use feed::{DataFeed, FEED_LINES};
pub use synthetic::synthetic_bars;

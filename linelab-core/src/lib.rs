//! LineLab Core: time-series line engine for bar-by-bar backtesting.
//!
//! This crate contains:
//! - Line storage (`Buffer`, `LineSet`) with relative "ago" indexing
//! - The `Computation` protocol: incremental `advance_one` and batch
//!   `evaluate_range`, bit-identical by construction
//! - Min-period propagation and NaN warm-up
//! - Moving averages (SMA, EMA, WMA, SMMA, DEMA, TEMA), their oscillators and
//!   envelopes
//! - `LineGraph`: an arena that owns the data feed and drives every node
//! - Config-driven wiring from TOML

pub mod components;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod lines;

pub use components::{Computation, IndicatorConfig, Phase};
pub use domain::Bar;
pub use engine::{EngineConfig, EvalMode, LineGraph, WarmupState};
pub use error::{ConfigError, GraphError};
pub use lines::{Buffer, LineId, LineSet, NodeId, SeriesSource};

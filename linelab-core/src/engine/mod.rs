//! Graph engine: owns the feed and the computations, and drives them bar by
//! bar or over a whole loaded history.
//!
//! - `graph`: the `LineGraph` arena, wiring and the two evaluation modes
//! - `config`: TOML-described graphs (`EngineConfig`)
//! - `warmup`: bar counter for orchestration code that waits on readiness

pub mod config;
pub mod graph;
pub mod warmup;

pub use config::{EngineConfig, EvalMode, IndicatorEntry};
pub use graph::LineGraph;
pub use warmup::WarmupState;

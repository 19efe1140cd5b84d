//! The computation protocol and the config-driven factory.
//!
//! - `computation`: the `Computation` trait, lifecycle phases and batch bounds
//! - `factory`: `IndicatorConfig`, the declarative form of every indicator

pub mod computation;
pub mod factory;

pub use computation::{ready_at, Computation, Phase, Progress};
pub use factory::IndicatorConfig;

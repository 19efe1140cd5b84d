//! Domain types shared by feeds and the engine.

pub mod bar;

pub use bar::Bar;

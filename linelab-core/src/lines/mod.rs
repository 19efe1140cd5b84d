//! Line primitives: buffers, line sets and the handles that connect them.

pub mod buffer;
pub mod line_set;
pub mod source;

pub use buffer::Buffer;
pub use line_set::{LineId, LineSet};
pub use source::{Inputs, NodeId, Producer, SeriesSource};

//! LineSet: an ordered, optionally named collection of buffers.
//!
//! One LineSet describes one multi-field series: the OHLCV lines of a feed or
//! the output channels of an indicator. Registration order is the canonical
//! line order; line 0 is the primary output.

use serde::{Deserialize, Serialize};

use super::buffer::Buffer;

/// Stable handle to a buffer inside a `LineSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub usize);

impl LineId {
    pub const PRIMARY: LineId = LineId(0);
}

#[derive(Debug, Clone, Default)]
pub struct LineSet {
    buffers: Vec<Buffer>,
    names: Vec<Option<String>>,
}

impl LineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set with one named buffer per entry, in order.
    pub fn with_names(names: &[&str]) -> Self {
        let mut set = Self::new();
        for name in names {
            set.add_named(name);
        }
        set
    }

    /// Register an anonymous buffer.
    pub fn add_buffer(&mut self) -> LineId {
        self.buffers.push(Buffer::new());
        self.names.push(None);
        LineId(self.buffers.len() - 1)
    }

    /// Register a buffer addressable by `name`.
    pub fn add_named(&mut self, name: &str) -> LineId {
        let id = self.add_buffer();
        self.names[id.0] = Some(name.to_string());
        id
    }

    pub fn get(&self, id: LineId) -> Option<&Buffer> {
        self.buffers.get(id.0)
    }

    pub fn get_mut(&mut self, id: LineId) -> Option<&mut Buffer> {
        self.buffers.get_mut(id.0)
    }

    /// Buffer for `id`.
    ///
    /// # Panics
    /// If `id` was not issued by this set.
    pub fn line(&self, id: LineId) -> &Buffer {
        &self.buffers[id.0]
    }

    /// Mutable buffer for `id`; only the owner of the set writes.
    ///
    /// # Panics
    /// If `id` was not issued by this set.
    pub fn line_mut(&mut self, id: LineId) -> &mut Buffer {
        &mut self.buffers[id.0]
    }

    pub fn id_of(&self, name: &str) -> Option<LineId> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .map(LineId)
    }

    pub fn by_name(&self, name: &str) -> Option<&Buffer> {
        self.id_of(name).map(|id| &self.buffers[id.0])
    }

    pub fn name_of(&self, id: LineId) -> Option<&str> {
        self.names.get(id.0).and_then(|n| n.as_deref())
    }

    /// Number of elements appended to the primary line.
    pub fn size(&self) -> usize {
        self.buffers.first().map_or(0, Buffer::len)
    }

    /// Number of lines in the set.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LineId, &Buffer)> {
        self.buffers.iter().enumerate().map(|(i, b)| (LineId(i), b))
    }

    /// True when every buffer holds the same number of elements.
    pub fn is_aligned(&self) -> bool {
        let size = self.size();
        self.buffers.iter().all(|b| b.len() == size)
    }

    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.reset();
        }
    }
}

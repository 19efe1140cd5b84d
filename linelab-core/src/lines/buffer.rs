//! Buffer: a single growable numeric series with ago-relative addressing.
//!
//! Values are stored in chronological order. A cursor marks the "current" bar;
//! `value_at(0)` reads it and `value_at(-n)` reads `n` bars before it. Reads that
//! fall before the start of the series return NaN, which is the warm-up signal
//! consumers check for.

/// Growable f64 series with a movable read cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    values: Vec<f64>,
    idx: Option<usize>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            idx: None,
        }
    }

    /// Push `value` as the newest element and move the cursor onto it.
    #[inline]
    pub fn append(&mut self, value: f64) {
        self.values.push(value);
        self.idx = Some(self.values.len() - 1);
    }

    /// Value `ago` bars relative to the cursor (`ago <= 0`).
    ///
    /// Returns NaN for an empty buffer or when `cursor + ago` falls before the
    /// first element. A positive `ago` is future access: it panics in debug
    /// builds and returns NaN in release builds.
    #[inline]
    pub fn value_at(&self, ago: isize) -> f64 {
        debug_assert!(ago <= 0, "future access: ago={ago} must be <= 0");
        if ago > 0 {
            return f64::NAN;
        }
        let Some(idx) = self.idx else {
            return f64::NAN;
        };
        let back = ago.unsigned_abs();
        if back > idx {
            return f64::NAN;
        }
        self.values[idx - back]
    }

    /// Absolute read by index, NaN when out of range.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(f64::NAN)
    }

    /// Move the cursor without appending. Clamped to the last stored element.
    pub fn reposition(&mut self, new_idx: usize) {
        self.idx = if self.values.is_empty() {
            None
        } else {
            Some(new_idx.min(self.values.len() - 1))
        };
    }

    /// Drop all values and return the cursor to empty.
    pub fn reset(&mut self) {
        self.values.clear();
        self.idx = None;
    }

    /// Grow the storage with NaN up to `end` elements and hand it out for a
    /// batch fill. The cursor is left untouched; callers reposition it once
    /// the range has been written.
    pub fn storage_to(&mut self, end: usize) -> &mut [f64] {
        if self.values.len() < end {
            self.values.resize(end, f64::NAN);
        }
        &mut self.values
    }

    pub fn cursor(&self) -> Option<usize> {
        self.idx
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

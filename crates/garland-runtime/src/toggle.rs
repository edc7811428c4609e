//! The shared exploded/gathered toggle

/// A single boolean state cell with edge detection.
///
/// One writer (the UI shell), any number of per-frame readers. `set`
/// reports whether the value actually changed, so a held key or repeated
/// press produces exactly one retarget per transition, never one per frame.
#[derive(Debug, Default)]
pub struct ToggleCell {
    value: bool,
}

impl ToggleCell {
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    pub fn get(&self) -> bool {
        self.value
    }

    /// Write a new level. Returns true only on an edge (value changed).
    pub fn set(&mut self, value: bool) -> bool {
        let edge = value != self.value;
        self.value = value;
        edge
    }

    /// Flip the level, returning the new value. Always an edge.
    pub fn flip(&mut self) -> bool {
        self.value = !self.value;
        self.value
    }
}

use super::prelude::{AtomicU32, Ordering};
use super::OPERATOR_COUNT;

/// Atomic f32, stored as bits in an `AtomicU32`.
///
/// Loads and stores are `Relaxed`: the cells carry display-only data, a value
/// one block old is fine, and no other memory is published through them.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Per-operator activity levels of the most recently triggered voice.
///
/// Written once per block by the render thread, read by anyone.
#[derive(Debug, Default)]
pub struct ActivityMeters {
    cells: [AtomicF32; OPERATOR_COUNT],
}

impl ActivityMeters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level in [0, 1]. Out-of-range indices read as 0.
    pub fn activity_level(&self, op_index: usize) -> f32 {
        self.cells.get(op_index).map_or(0.0, AtomicF32::get)
    }

    pub fn levels(&self) -> [f32; OPERATOR_COUNT] {
        core::array::from_fn(|i| self.cells[i].get())
    }

    pub(crate) fn publish(&self, levels: [f32; OPERATOR_COUNT]) {
        for (cell, level) in self.cells.iter().zip(levels) {
            let level = if level.is_finite() {
                level.clamp(0.0, 1.0)
            } else {
                0.0
            };
            cell.set(level);
        }
    }
}

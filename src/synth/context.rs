use super::algorithm::{Algorithm, ALGORITHMS};
use super::ratio::{Ratio, RATIOS};

/// Read-only handle to the constant tables, handed to voices and operators
/// at construction. Nothing in here changes while the engine runs.
#[derive(Clone, Copy, Debug)]
pub struct Tables {
    pub algorithms: &'static [Algorithm],
    pub ratios: &'static [Ratio],
}

impl Tables {
    pub fn algorithm(&self, id: usize) -> &'static Algorithm {
        debug_assert!(id < self.algorithms.len(), "algorithm id {} out of range", id);
        &self.algorithms[id.min(self.algorithms.len() - 1)]
    }

    pub fn ratio(&self, index: usize) -> Ratio {
        debug_assert!(index < self.ratios.len(), "ratio index {} out of range", index);
        self.ratios[index.min(self.ratios.len() - 1)]
    }

    pub fn algorithm_count(&self) -> usize {
        self.algorithms.len()
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            algorithms: &ALGORITHMS,
            ratios: &RATIOS,
        }
    }
}

impl PartialEq for Tables {
    fn eq(&self, other: &Self) -> bool {
        // Same tables, not merely equal contents.
        self.algorithms.as_ptr() == other.algorithms.as_ptr()
            && self.algorithms.len() == other.algorithms.len()
            && self.ratios.as_ptr() == other.ratios.as_ptr()
            && self.ratios.len() == other.ratios.len()
    }
}

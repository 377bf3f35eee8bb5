use super::prelude::fmt;

/// A frequency multiplier stored as a fraction, so it can be shown as e.g. "3/2".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: u8,
    pub denominator: u8,
}

impl Ratio {
    const fn new(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn value(&self) -> f32 {
        self.numerator as f32 / self.denominator as f32
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

pub const RATIO_COUNT: usize = 19;

/// Index of the 1/1 ratio.
pub const UNITY_RATIO_INDEX: usize = 5;

pub static RATIOS: [Ratio; RATIO_COUNT] = [
    Ratio::new(1, 4),
    Ratio::new(1, 3),
    Ratio::new(1, 2),
    Ratio::new(2, 3),
    Ratio::new(3, 4),
    Ratio::new(1, 1),
    Ratio::new(5, 4),
    Ratio::new(4, 3),
    Ratio::new(3, 2),
    Ratio::new(2, 1),
    Ratio::new(5, 2),
    Ratio::new(3, 1),
    Ratio::new(7, 2),
    Ratio::new(4, 1),
    Ratio::new(5, 1),
    Ratio::new(6, 1),
    Ratio::new(7, 1),
    Ratio::new(8, 1),
    Ratio::new(9, 1),
];

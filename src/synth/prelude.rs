// Shared imports for the synth modules

pub use std::fmt;
pub use std::sync::atomic::{AtomicU32, Ordering};
pub use std::sync::Arc;

// PI constant
pub use core::f32::consts::PI;

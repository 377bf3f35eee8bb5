use crate::synth::prelude::PI;

/// Phase-accumulating sine that takes a phase offset per sample
/// (phase modulation rather than frequency modulation).
///
/// Phase is measured in half cycles and kept in [-1, 1), so an offset of
/// 1.0 shifts the wave by pi radians.
#[derive(Debug, Clone, PartialEq)]
pub struct SineOscillator {
    phase: f32,
    increment: f32,
    frequency: f32,
    sample_rate: f32,
}

impl SineOscillator {
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            increment: 0.0,
            frequency: 0.0,
            sample_rate,
        };
        osc.set_frequency(frequency);
        osc
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.increment = 2.0 * frequency / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generates the next sample with `phase_offset` added to the running phase.
    pub fn next(&mut self, phase_offset: f32) -> f32 {
        let out = (PI * wrap(self.phase + phase_offset)).sin();
        self.phase = wrap(self.phase + self.increment);
        out
    }
}

/// Wraps `x` into [-1, 1).
fn wrap(x: f32) -> f32 {
    if (-1.0..1.0).contains(&x) {
        return x;
    }
    if !x.is_finite() {
        return 0.0;
    }
    x - 2.0 * ((x + 1.0) * 0.5).floor()
}

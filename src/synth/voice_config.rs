/// Master (amplitude) envelope settings for every voice, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterEnvelopeConfig {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl MasterEnvelopeConfig {
    /// Normalized attack control (0..1) to seconds.
    pub fn attack_time(a: f32) -> f32 {
        a * a * 8.0 + 0.005
    }

    /// Normalized decay control (0..1) to seconds.
    pub fn decay_time(d: f32) -> f32 {
        d * d * 4.0 + 0.005
    }

    /// Normalized release control (0..1) to seconds.
    pub fn release_time(r: f32) -> f32 {
        r * r * 8.0 + 0.005
    }
}

impl Default for MasterEnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 0.1,
            sustain: 0.7,
            release: 2.0,
        }
    }
}

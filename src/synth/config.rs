use super::error::EngineError;
use super::voice_config::MasterEnvelopeConfig;

/// Construction-time settings for an [`Engine`](super::Engine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub voice_count: usize,
    pub sample_rate: f32,
    /// Largest block the audio backend will ask for. Backends split bigger buffers.
    pub block_size: usize,
    /// Capacity of the control-to-render action queue.
    pub queue_capacity: usize,
    /// Gain applied to the summed voices before soft clipping.
    pub output_gain: f32,
    pub master_envelope: MasterEnvelopeConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.voice_count == 0 {
            return Err(EngineError::InvalidConfig(
                "voice_count must be at least 1".to_string(),
            ));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.block_size == 0 {
            return Err(EngineError::InvalidConfig(
                "block_size must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        if !(self.output_gain.is_finite() && self.output_gain >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "output_gain must be a non-negative number, got {}",
                self.output_gain
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voice_count: 6,
            sample_rate: 44100.0, // Standard audio sample rate
            block_size: 256,
            queue_capacity: 256,
            output_gain: 0.25,
            master_envelope: MasterEnvelopeConfig::default(),
        }
    }
}

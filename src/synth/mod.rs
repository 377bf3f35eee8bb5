pub mod action;
pub mod algorithm;
pub mod config;
pub mod context;
pub mod controller;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod meter;
pub mod operator;
pub mod oscillator;
pub mod pool;
pub mod prelude;
pub mod preset;
pub mod ratio;
pub mod voice;
pub mod voice_config;

pub use action::{Action, ActionReceiver, ActionSink, Dispatch, OperatorParam};
pub use algorithm::{Algorithm, ALGORITHMS};
pub use config::EngineConfig;
pub use context::Tables;
pub use controller::Controller;
pub use engine::Engine;
pub use error::EngineError;
pub use meter::ActivityMeters;
pub use operator::Operator;
pub use pool::VoicePool;
pub use preset::{Preset, PresetSelector, FACTORY_PRESETS};
pub use ratio::{Ratio, RATIOS};
pub use voice::Voice;
pub use voice_config::MasterEnvelopeConfig;

/// Number of operators in every voice.
pub const OPERATOR_COUNT: usize = 4;

/// Converts a MIDI note number to a frequency in Hz (A4 = 440 Hz).
pub fn midi_note_to_frequency(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

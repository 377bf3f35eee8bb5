//! Polyphonic four-operator FM voice engine.
//!
//! The render side is [`synth::Engine`]: call [`synth::Engine::process`] once per
//! audio buffer. The control side is [`synth::Controller`], which queues
//! [`synth::Action`]s for the next block and reads the operator activity meters.

pub mod synth;

#[cfg(feature = "native")]
pub mod audio;
#[cfg(feature = "native")]
pub mod input;
#[cfg(feature = "native")]
pub mod runtime;

use crate::audio::{AudioBackend, CpalBackend};
use crate::input::KeyboardHandler;
use crate::synth::{Engine, EngineConfig};
use std::time::Duration;

/// Opens the audio device, starts the engine on the audio thread and polls the
/// keyboard on the calling thread until the process is killed.
pub fn start() -> Result<(), Box<dyn std::error::Error>> {
    let defaults = EngineConfig::default();
    let mut audio_backend = CpalBackend::open(defaults.block_size)?;

    let config = EngineConfig {
        sample_rate: audio_backend.sample_rate(),
        ..defaults
    };
    let (engine, controller) = Engine::new(config)?;
    audio_backend.attach(engine);
    audio_backend.start()?;

    let mut keyboard_handler = KeyboardHandler::new(controller);
    let mut last_levels = [0.0f32; 4];

    loop {
        keyboard_handler.update();

        let levels = keyboard_handler.controller().meters().levels();
        if levels
            .iter()
            .zip(last_levels.iter())
            .any(|(a, b)| (a - b).abs() > 0.05)
        {
            log::debug!(target: "ottofm::runtime", "activity {:.2?}", levels);
            last_levels = levels;
        }

        std::thread::sleep(Duration::from_millis(10));
    }
}

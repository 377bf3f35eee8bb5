use crate::audio::AudioBackend;
use crate::synth::Engine;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};

/// Scratch size in frames. Devices that ignore `BufferSize::Fixed` rarely
/// hand out more than this, so each callback is normally one engine block.
const MAX_CALLBACK_FRAMES: usize = 8192;

/// cpal output stream that owns the engine inside its callback.
///
/// The callback never locks: control goes through the engine's
/// [`Controller`](crate::synth::Controller) instead.
pub struct CpalBackend {
    stream: Option<Stream>,
    device: cpal::Device,
    stream_config: cpal::StreamConfig,
    sample_format: SampleFormat,
    block_size: usize,
    engine: Option<Engine>,
}

impl CpalBackend {
    /// Opens the output device. The engine is attached afterwards, once it has
    /// been built for [`CpalBackend::sample_rate`].
    pub fn open(block_size: usize) -> Result<Self, Box<dyn std::error::Error>> {
        let host = cpal::default_host();
        let device = Self::select_output_device(&host)?;
        log::info!(
            target: "ottofm::audio",
            "Selected device: {}",
            device.name().unwrap_or_default()
        );

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let mut stream_config: cpal::StreamConfig = supported_config.into();
        stream_config.buffer_size = cpal::BufferSize::Fixed(block_size as u32);

        Ok(Self {
            stream: None,
            device,
            stream_config,
            sample_format,
            block_size,
            engine: None,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.stream_config.sample_rate.0 as f32
    }

    pub fn attach(&mut self, engine: Engine) {
        self.engine = Some(engine);
    }

    fn select_output_device(
        host: &cpal::Host,
    ) -> Result<cpal::Device, Box<dyn std::error::Error>> {
        if cfg!(target_os = "linux") {
            // Prefer the sound server over raw hardware devices.
            for device in host.output_devices()? {
                let name = device.name().unwrap_or_default().to_lowercase();
                if name.starts_with("default:") || name.contains("pipewire") {
                    return Ok(device);
                }
            }
        }
        host.default_output_device()
            .ok_or_else(|| "No output device available".into())
    }

    fn build_stream(&mut self, mut engine: Engine) -> Result<Stream, Box<dyn std::error::Error>> {
        let channels = self.stream_config.channels as usize;
        // Allocated once. Callbacks longer than this are split into several blocks.
        let mut scratch = vec![0.0f32; self.block_size.max(MAX_CALLBACK_FRAMES)];

        let stream = match self.sample_format {
            SampleFormat::F32 => self.device.build_output_stream(
                &self.stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    engine.render_interleaved(&mut scratch, data, channels);
                },
                |err| log::error!(target: "ottofm::audio", "Stream error: {}", err),
                None,
            )?,
            _ => return Err("Unsupported sample format".into()),
        };

        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn start(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let engine = self.engine.take().ok_or("No engine attached")?;
        let stream = self.build_stream(engine)?;
        stream.play()?;
        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stream) = &self.stream {
            if let Err(e) = stream.pause() {
                log::warn!(target: "ottofm::audio", "Failed to stop stream: {}", e);
            }
        }
    }
}

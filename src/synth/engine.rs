use rtrb::{Consumer, RingBuffer};

use super::action::{Action, ActionReceiver, ActionSink, Dispatch};
use super::config::EngineConfig;
use super::context::Tables;
use super::controller::Controller;
use super::error::EngineError;
use super::meter::ActivityMeters;
use super::pool::VoicePool;
use super::prelude::Arc;
use super::OPERATOR_COUNT;

/// The main synthesizer engine: owns the voice pool and the current algorithm,
/// and publishes operator activity for the UI.
pub struct Engine {
    pool: VoicePool,
    tables: Tables,
    algorithm: usize,
    current_operator: usize,
    // Index into the pool, not an owning reference.
    last_voice: Option<usize>,
    output_gain: f32,
    actions: Consumer<Action>,
    meters: Arc<ActivityMeters>,
}

impl Engine {
    pub const NAME: &'static str = "OTTO.FM";

    /// Builds the engine and the control handle that feeds it.
    pub fn new(config: EngineConfig) -> Result<(Self, Controller), EngineError> {
        Self::with_tables(config, Tables::default())
    }

    pub fn with_tables(
        config: EngineConfig,
        tables: Tables,
    ) -> Result<(Self, Controller), EngineError> {
        config.validate()?;
        if tables.algorithms.is_empty() || tables.ratios.is_empty() {
            return Err(EngineError::InvalidConfig(
                "algorithm and ratio tables must not be empty".to_string(),
            ));
        }

        let (producer, consumer) = RingBuffer::new(config.queue_capacity);
        let meters = Arc::new(ActivityMeters::new());
        let pool = VoicePool::new(
            config.voice_count,
            tables,
            config.sample_rate,
            &config.master_envelope,
        );

        log::info!(
            target: "ottofm::engine",
            "{} ready: {} voices at {} Hz, {} algorithms",
            Self::NAME,
            config.voice_count,
            config.sample_rate,
            tables.algorithm_count()
        );

        let engine = Self {
            pool,
            tables,
            algorithm: 0,
            current_operator: 0,
            last_voice: None,
            output_gain: config.output_gain,
            actions: consumer,
            meters: Arc::clone(&meters),
        };
        Ok((engine, Controller::new(producer, meters)))
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Renders one block. Queued actions are applied first, so they only
    /// ever affect whole blocks.
    pub fn process(&mut self, output: &mut [f32]) {
        while let Ok(action) = self.actions.pop() {
            let _ = self.action(action);
        }

        self.pool.process(output);
        for sample in output.iter_mut() {
            *sample = soft_clip(*sample * self.output_gain);
        }

        self.publish_activity();
    }

    /// Renders the same mono signal into every channel of an interleaved buffer.
    ///
    /// `scratch` holds one mono block. A buffer with more frames than `scratch`
    /// is rendered as several blocks. Returns how many blocks were rendered.
    pub fn render_interleaved(
        &mut self,
        scratch: &mut [f32],
        data: &mut [f32],
        channels: usize,
    ) -> usize {
        if channels == 0 || scratch.is_empty() {
            return 0;
        }
        let mut blocks = 0;
        for frames in data.chunks_mut(scratch.len() * channels) {
            let block = &mut scratch[..frames.len() / channels];
            self.process(block);
            for (frame, sample) in frames.chunks_mut(channels).zip(block.iter()) {
                frame.fill(*sample);
            }
            blocks += 1;
        }
        blocks
    }

    fn publish_activity(&self) {
        let levels = match self.last_voice.and_then(|i| self.pool.voice(i)) {
            Some(voice) => core::array::from_fn(|op| voice.activity_level(op)),
            None => [0.0; OPERATOR_COUNT],
        };
        self.meters.publish(levels);
    }

    pub fn set_algorithm(&mut self, id: usize) {
        debug_assert!(id < self.tables.algorithm_count(), "algorithm id {} out of range", id);
        self.algorithm = id.min(self.tables.algorithm_count() - 1);
        self.pool.set_algorithm(self.algorithm);
    }

    pub fn note_on(&mut self, note: u8, frequency: f32) {
        self.last_voice = Some(self.pool.note_on(note, frequency));
    }

    pub fn note_off(&mut self, note: u8) {
        self.pool.note_off(note);
    }

    pub fn algorithm(&self) -> usize {
        self.algorithm
    }

    pub fn current_operator(&self) -> usize {
        self.current_operator
    }

    pub fn last_voice(&self) -> Option<usize> {
        self.last_voice
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut VoicePool {
        &mut self.pool
    }

    pub fn meters(&self) -> Arc<ActivityMeters> {
        Arc::clone(&self.meters)
    }

    pub fn activity_level(&self, op_index: usize) -> f32 {
        self.meters.activity_level(op_index)
    }
}

impl ActionReceiver for Engine {
    fn action(&mut self, action: Action) -> Dispatch {
        let dispatch = self.pool.action(action).or_else(|| {
            match action {
                Action::Algorithm(id) => self.set_algorithm(id),
                Action::CurrentOperator(op) => {
                    debug_assert!(op < OPERATOR_COUNT, "operator index {} out of range", op);
                    self.current_operator = op.min(OPERATOR_COUNT - 1);
                }
                Action::NoteOn { note, frequency } => self.note_on(note, frequency),
                Action::NoteOff { note } => self.note_off(note),
                _ => return Dispatch::Ignored,
            }
            Dispatch::Handled
        });
        if !dispatch.is_handled() {
            log::trace!(target: "ottofm::engine", "no owner for {:?}", action);
        }
        dispatch
    }
}

/// Applies actions directly, on the render side, between blocks.
impl ActionSink for Engine {
    fn send(&mut self, action: Action) -> Result<(), EngineError> {
        let _ = self.action(action);
        Ok(())
    }
}

/// Soft clipper, flat at +/-1 beyond +/-3.
pub fn soft_clip(x: f32) -> f32 {
    if x < -3.0 {
        -1.0
    } else if x > 3.0 {
        1.0
    } else {
        x * (27.0 + x * x) / (27.0 + 9.0 * x * x)
    }
}

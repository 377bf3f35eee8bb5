use super::action::{Action, ActionReceiver, Dispatch, OperatorParam};
use super::context::Tables;
use super::envelope::EnvelopeGenerator;
use super::oscillator::SineOscillator;
use super::ratio::{Ratio, UNITY_RATIO_INDEX};

/// Hz of detune for a full-scale detune input.
const DETUNE_RANGE: f32 = 25.0;

/// One FM node: a sine oscillator, an envelope and a feedback path.
///
/// Whether it acts as a modulator or a carrier is decided by the voice's
/// algorithm, never by a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    index: usize,
    tables: Tables,
    oscillator: SineOscillator,
    envelope: EnvelopeGenerator,
    modulator: bool,
    output_level: f32,
    feedback: f32,
    fm_amount: f32,
    // Kept so either envelope setter can recompute decay and release.
    sustain_position: f32,
    decay_release: f32,
    ratio: Ratio,
    detune: f32,
    base_frequency: f32,
    previous_output: f32,
}

impl Operator {
    pub fn new(index: usize, tables: Tables, sample_rate: f32) -> Self {
        let mut op = Self {
            index,
            tables,
            oscillator: SineOscillator::new(440.0, sample_rate),
            envelope: EnvelopeGenerator::new(sample_rate),
            modulator: false,
            output_level: 1.0,
            feedback: 0.0,
            fm_amount: 1.0,
            sustain_position: 1.0,
            decay_release: 1.0,
            ratio: tables.ratio(UNITY_RATIO_INDEX),
            detune: 0.0,
            base_frequency: 440.0,
            previous_output: 0.0,
        };
        op.set_attack(0.0);
        op.set_sustain_position(1.0);
        op.update_frequency();
        op
    }

    /// Computes one sample. `phase_mod` is added to the oscillator phase, in half cycles.
    pub fn value(&mut self, phase_mod: f32) -> f32 {
        // Advanced in both roles so the activity meter follows carriers too.
        let env = self.envelope.next();
        if self.modulator {
            env * self.oscillator.next(phase_mod) * self.output_level * self.fm_amount
        } else {
            self.previous_output = self
                .oscillator
                .next(phase_mod + self.feedback * self.previous_output)
                * self.output_level;
            self.previous_output
        }
    }

    /// Envelope-scaled output level, for metering only.
    pub fn activity_level(&self) -> f32 {
        self.envelope.value() * self.output_level
    }

    pub fn set_base_frequency(&mut self, frequency: f32) {
        self.base_frequency = frequency;
        self.update_frequency();
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    /// Normalized attack. Never zero-length, which would click.
    pub fn set_attack(&mut self, a: f32) {
        self.envelope.set_attack(3.0 * a * a + 0.005);
    }

    pub fn set_sustain_position(&mut self, s: f32) {
        self.sustain_position = s.clamp(0.0, 1.0);
        self.envelope.set_sustain(self.sustain_position);
        self.update_decay_release();
    }

    pub fn set_decay_release(&mut self, dr: f32) {
        self.decay_release = dr.max(0.0);
        self.update_decay_release();
    }

    pub fn set_detune(&mut self, d: f32) {
        self.detune = d * DETUNE_RANGE;
        self.update_frequency();
    }

    pub fn set_ratio_index(&mut self, index: usize) {
        self.ratio = self.tables.ratio(index);
        self.update_frequency();
    }

    pub fn set_output_level(&mut self, level: f32) {
        self.output_level = level;
    }

    pub fn set_fm_amount(&mut self, fm: f32) {
        self.fm_amount = fm;
    }

    /// Chooses the role. Voices call this from their algorithm; no action reaches it.
    pub fn set_modulator(&mut self, modulator: bool) {
        self.modulator = modulator;
    }

    /// Soft envelope retrigger.
    pub fn reset(&mut self) {
        self.envelope.reset_soft();
    }

    pub fn release(&mut self) {
        self.envelope.release();
    }

    /// Forces the envelope to idle right away.
    pub fn finish(&mut self) {
        self.envelope.finish();
    }

    /// Starts a new note: clears oscillator phase and feedback memory, then retriggers.
    pub(crate) fn note_on(&mut self, frequency: f32) {
        self.oscillator.reset();
        self.previous_output = 0.0;
        self.set_base_frequency(frequency);
        self.reset();
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_modulator(&self) -> bool {
        self.modulator
    }

    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }

    pub fn ratio(&self) -> Ratio {
        self.ratio
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.envelope
    }

    pub fn previous_output(&self) -> f32 {
        self.previous_output
    }

    fn update_decay_release(&mut self) {
        let s = self.sustain_position;
        let dr = self.decay_release;
        self.envelope.set_decay(3.0 * dr * (1.0 - s));
        self.envelope.set_release(3.0 * dr * s);
    }

    fn update_frequency(&mut self) {
        let frequency = self.base_frequency * self.ratio.value() + self.detune;
        self.oscillator.set_frequency(frequency);
    }
}

impl ActionReceiver for Operator {
    fn action(&mut self, action: Action) -> Dispatch {
        let param = match action {
            Action::Operator { op, param } if op == self.index => param,
            _ => return Dispatch::Ignored,
        };
        match param {
            OperatorParam::Feedback(value) => self.set_feedback(value),
            OperatorParam::Attack(value) => self.set_attack(value),
            OperatorParam::SustainPosition(value) => self.set_sustain_position(value),
            OperatorParam::DecayRelease(value) => self.set_decay_release(value),
            OperatorParam::Detune(value) => self.set_detune(value),
            OperatorParam::RatioIndex(index) => self.set_ratio_index(index),
            OperatorParam::OutputLevel(value) => self.set_output_level(value),
        }
        Dispatch::Handled
    }
}

use super::action::{Action, ActionReceiver, Dispatch};
use super::context::Tables;
use super::envelope::EnvelopeGenerator;
use super::operator::Operator;
use super::voice_config::MasterEnvelopeConfig;
use super::OPERATOR_COUNT;

/// Represents a single polyphonic voice: four operators and a master envelope.
#[derive(Debug, Clone)]
pub struct Voice {
    operators: [Operator; OPERATOR_COUNT],
    envelope: EnvelopeGenerator, // Main amplitude envelope for the voice
    tables: Tables,
    algorithm: usize,
    active: bool,
    note: Option<u8>,
    note_frequency: f32,
    triggered_at: u64, // Pool event stamp of the last note-on
    released_at: Option<u64>, // Pool event stamp of the last note-off, while releasing
    // Triggered but not rendered yet; a release now waits for the end of the block.
    fresh: bool,
    release_pending: bool,
}

impl Voice {
    /// Creates a new, inactive voice.
    pub fn new(tables: Tables, sample_rate: f32, master: &MasterEnvelopeConfig) -> Self {
        let mut envelope = EnvelopeGenerator::new(sample_rate);
        envelope.set_params(master.attack, master.decay, master.sustain, master.release);
        let mut voice = Self {
            operators: core::array::from_fn(|i| Operator::new(i, tables, sample_rate)),
            envelope,
            tables,
            algorithm: 0,
            active: false,
            note: None,
            note_frequency: 0.0,
            triggered_at: 0,
            released_at: None,
            fresh: false,
            release_pending: false,
        };
        voice.set_algorithm(0);
        voice
    }

    /// Retriggers every envelope, recomputes operator frequencies and marks the voice active.
    pub fn note_on(&mut self, frequency: f32) {
        self.note_frequency = frequency;
        for op in self.operators.iter_mut() {
            op.note_on(frequency);
        }
        self.envelope.reset_soft();
        self.active = true;
        self.released_at = None;
        self.fresh = true;
        self.release_pending = false;
    }

    /// Starts the release. The voice keeps sounding until the master envelope finishes.
    pub fn note_off(&mut self) {
        self.envelope.release();
        for op in self.operators.iter_mut() {
            op.release();
        }
    }

    /// Silences every envelope immediately. Used before stealing a voice.
    pub fn finish(&mut self) {
        self.envelope.finish();
        for op in self.operators.iter_mut() {
            op.finish();
        }
    }

    /// Applies an algorithm. Only call between blocks.
    pub fn set_algorithm(&mut self, id: usize) {
        let algorithm = self.tables.algorithm(id);
        self.algorithm = id.min(self.tables.algorithm_count() - 1);
        for (i, op) in self.operators.iter_mut().enumerate() {
            op.set_modulator(algorithm.is_modulator(i));
        }
    }

    /// Adds this voice's contribution to `output`.
    pub fn process(&mut self, output: &mut [f32]) {
        let algorithm = self.tables.algorithm(self.algorithm);
        for sample in output.iter_mut() {
            let mut phase_mod = [0.0f32; OPERATOR_COUNT];
            let mut sum = 0.0;
            for i in (0..OPERATOR_COUNT).rev() {
                let out = self.operators[i].value(phase_mod[i]);
                if self.operators[i].is_modulator() {
                    for (target, input) in phase_mod.iter_mut().enumerate().take(i) {
                        if algorithm.modulates(i, target) {
                            *input += out;
                        }
                    }
                } else {
                    sum += out;
                }
            }
            *sample += sum * self.envelope.next();
        }

        self.fresh = false;
        if self.release_pending {
            self.release_pending = false;
            self.note_off();
        }
    }

    /// Active and the master envelope has run out.
    pub fn is_finished(&self) -> bool {
        self.active && self.envelope.is_idle()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_releasing(&self) -> bool {
        self.active && self.released_at.is_some()
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn note_frequency(&self) -> f32 {
        self.note_frequency
    }

    pub fn algorithm(&self) -> usize {
        self.algorithm
    }

    pub fn activity_level(&self, op_index: usize) -> f32 {
        debug_assert!(op_index < OPERATOR_COUNT);
        self.operators[op_index.min(OPERATOR_COUNT - 1)].activity_level()
    }

    pub fn operator(&self, op_index: usize) -> &Operator {
        &self.operators[op_index]
    }

    pub fn operators(&self) -> &[Operator; OPERATOR_COUNT] {
        &self.operators
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.envelope
    }

    pub(crate) fn triggered_at(&self) -> u64 {
        self.triggered_at
    }

    pub(crate) fn released_at(&self) -> Option<u64> {
        self.released_at
    }

    /// Binds the voice to `note` and triggers it, stamping it with `stamp`.
    pub(crate) fn trigger(&mut self, note: u8, frequency: f32, stamp: u64) {
        self.note = Some(note);
        self.triggered_at = stamp;
        self.note_on(frequency);
    }

    /// Marks the voice as releasing. A note released before it rendered any
    /// samples still plays one block, so a quick tap is never silent.
    pub(crate) fn release_at(&mut self, stamp: u64) {
        if self.released_at.is_some() {
            return;
        }
        self.released_at = Some(stamp);
        if self.fresh {
            self.release_pending = true;
        } else {
            self.note_off();
        }
    }

    /// Returns the voice to the free list. Operator envelopes are forced idle too,
    /// so a free voice meters exactly zero.
    pub(crate) fn free(&mut self) {
        self.finish();
        self.active = false;
        self.note = None;
        self.released_at = None;
        self.fresh = false;
        self.release_pending = false;
    }
}

impl ActionReceiver for Voice {
    fn action(&mut self, action: Action) -> Dispatch {
        if let Action::Operator { op, .. } = action {
            debug_assert!(op < OPERATOR_COUNT, "operator index {} out of range", op);
        }
        // Operators first, then the voice's own parameters.
        for op in self.operators.iter_mut() {
            if op.action(action).is_handled() {
                return Dispatch::Handled;
            }
        }
        match action {
            Action::Attack(a) => self
                .envelope
                .set_attack(MasterEnvelopeConfig::attack_time(a)),
            Action::Decay(d) => self.envelope.set_decay(MasterEnvelopeConfig::decay_time(d)),
            Action::Sustain(s) => self.envelope.set_sustain(s),
            Action::Release(r) => self
                .envelope
                .set_release(MasterEnvelopeConfig::release_time(r)),
            Action::FmAmount(fm) => {
                for op in self.operators.iter_mut() {
                    op.set_fm_amount(fm);
                }
            }
            _ => return Dispatch::Ignored,
        }
        Dispatch::Handled
    }
}

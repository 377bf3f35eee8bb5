use super::action::{Action, ActionReceiver, Dispatch};
use super::context::Tables;
use super::voice::Voice;
use super::voice_config::MasterEnvelopeConfig;

/// Fixed-size set of voices with note allocation and voice stealing.
///
/// All voices are built up front; nothing is allocated after construction.
pub struct VoicePool {
    voices: Vec<Voice>,
    // Monotonic stamp for trigger and release order.
    events: u64,
}

impl VoicePool {
    pub fn new(
        voice_count: usize,
        tables: Tables,
        sample_rate: f32,
        master: &MasterEnvelopeConfig,
    ) -> Self {
        let voices = (0..voice_count)
            .map(|_| Voice::new(tables, sample_rate, master))
            .collect();
        Self { voices, events: 0 }
    }

    /// Starts `note`, returning the index of the voice now playing it.
    ///
    /// A note that is already bound retriggers its own voice. Otherwise a free
    /// voice is used, or one is stolen: the voice longest in release, else the
    /// least recently triggered one.
    pub fn note_on(&mut self, note: u8, frequency: f32) -> usize {
        let index = match self.find_note(note) {
            Some(index) => {
                self.voices[index].finish();
                index
            }
            None => match self.find_free_voice() {
                Some(index) => index,
                None => {
                    let index = self.steal_voice();
                    log::trace!(
                        target: "ottofm::pool",
                        "stealing voice {} (note {:?}) for note {}",
                        index,
                        self.voices[index].note(),
                        note
                    );
                    self.voices[index].finish();
                    index
                }
            },
        };
        let stamp = self.next_stamp();
        self.voices[index].trigger(note, frequency, stamp);
        index
    }

    /// Releases the voice bound to `note`. Unknown or already released notes are ignored.
    pub fn note_off(&mut self, note: u8) {
        if let Some(index) = self.find_note(note) {
            let stamp = self.next_stamp();
            self.voices[index].release_at(stamp);
        }
    }

    pub fn all_notes_off(&mut self) {
        for index in 0..self.voices.len() {
            if self.voices[index].is_active() {
                let stamp = self.next_stamp();
                self.voices[index].release_at(stamp);
            }
        }
    }

    /// Applies an algorithm to every voice. Only call between blocks.
    pub fn set_algorithm(&mut self, id: usize) {
        for voice in self.voices.iter_mut() {
            voice.set_algorithm(id);
        }
    }

    /// Renders every active voice into `output` (overwriting it), then frees
    /// voices whose master envelope has finished.
    pub fn process(&mut self, output: &mut [f32]) {
        output.fill(0.0);
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.process(output);
        }
        for voice in self.voices.iter_mut().filter(|v| v.is_finished()) {
            voice.free();
        }
    }

    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// The voice currently bound to `note`, if any.
    pub fn find_note(&self, note: u8) -> Option<usize> {
        self.voices
            .iter()
            .position(|v| v.is_active() && v.note() == Some(note))
    }

    fn find_free_voice(&self) -> Option<usize> {
        self.voices.iter().position(|v| !v.is_active())
    }

    fn steal_voice(&self) -> usize {
        let longest_releasing = self
            .voices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.released_at().map(|stamp| (i, stamp)))
            .min_by_key(|&(_, stamp)| stamp)
            .map(|(i, _)| i);

        longest_releasing.unwrap_or_else(|| {
            self.voices
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| v.triggered_at())
                .map(|(i, _)| i)
                .unwrap_or(0)
        })
    }

    fn next_stamp(&mut self) -> u64 {
        self.events += 1;
        self.events
    }
}

impl ActionReceiver for VoicePool {
    /// Parameters reach every voice, free or not, so later notes pick them up.
    fn action(&mut self, action: Action) -> Dispatch {
        if action == Action::AllNotesOff {
            self.all_notes_off();
            return Dispatch::Handled;
        }
        let mut dispatch = Dispatch::Ignored;
        for voice in self.voices.iter_mut() {
            if voice.action(action).is_handled() {
                dispatch = Dispatch::Handled;
            }
        }
        dispatch
    }
}

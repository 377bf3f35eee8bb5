use crate::synth::algorithm::ALGORITHM_COUNT;
use crate::synth::{midi_note_to_frequency, Action, ActionSink, Controller, PresetSelector};
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::collections::HashMap;

/// Computer-keyboard control surface. Runs on the control thread and only
/// talks to the engine through its [`Controller`].
pub struct KeyboardHandler {
    device_state: DeviceState,
    key_states: HashMap<Keycode, bool>,
    key_to_note: HashMap<Keycode, u8>,
    control_keys: HashMap<Keycode, bool>, // Track control keys separately
    controller: Controller,
    presets: PresetSelector,
    algorithm: usize,
}

const CONTROL_KEYS: [Keycode; 9] = [
    Keycode::Comma,
    Keycode::Dot,
    Keycode::Minus,
    Keycode::Equal,
    Keycode::Key1,
    Keycode::Key2,
    Keycode::Key3,
    Keycode::Key4,
    Keycode::Escape,
];

impl KeyboardHandler {
    pub fn new(controller: Controller) -> Self {
        let device_state = DeviceState::new();

        // Define keyboard to note mapping
        let key_to_note: HashMap<Keycode, u8> = [
            // Bottom row - natural notes
            (Keycode::A, 57),         // A3
            (Keycode::S, 59),         // B3
            (Keycode::D, 60),         // C4
            (Keycode::F, 62),         // D4
            (Keycode::G, 64),         // E4
            (Keycode::H, 65),         // F4
            (Keycode::J, 67),         // G4
            (Keycode::K, 69),         // A4
            (Keycode::L, 71),         // B4
            (Keycode::Semicolon, 72), // C5
            // Top row - sharps
            (Keycode::W, 58),           // A#3
            (Keycode::R, 61),           // C#4
            (Keycode::T, 63),           // D#4
            (Keycode::U, 66),           // F#4
            (Keycode::I, 68),           // G#4
            (Keycode::O, 70),           // A#4
            (Keycode::LeftBracket, 73), // C#5
        ]
        .iter()
        .cloned()
        .collect();

        let key_states = key_to_note.keys().map(|key| (*key, false)).collect();
        let control_keys = CONTROL_KEYS.iter().map(|key| (*key, false)).collect();

        Self {
            device_state,
            key_states,
            key_to_note,
            control_keys,
            controller,
            presets: PresetSelector::default(),
            algorithm: 0,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn update(&mut self) {
        let keys: Vec<Keycode> = self.device_state.get_keys();

        for (key, note) in &self.key_to_note {
            let is_pressed = keys.contains(key);
            let was_pressed = self.key_states.get(key).cloned().unwrap_or(false);

            if is_pressed != was_pressed {
                let action = if is_pressed {
                    Action::NoteOn {
                        note: *note,
                        frequency: midi_note_to_frequency(*note),
                    }
                } else {
                    Action::NoteOff { note: *note }
                };
                log::debug!(target: "ottofm::input", "key {:?} -> {:?}", key, action);
                // Key state is only committed once the engine has the event.
                if self.controller.send(action).is_ok() {
                    self.key_states.insert(*key, is_pressed);
                }
            }
        }

        for key in CONTROL_KEYS.iter() {
            let is_pressed = keys.contains(key);
            let was_pressed = self.control_keys.get(key).cloned().unwrap_or(false);
            if is_pressed && !was_pressed {
                if let Err(e) = self.handle_control_key(*key) {
                    log::warn!(target: "ottofm::input", "control key {:?} dropped: {}", key, e);
                }
            }
            self.control_keys.insert(*key, is_pressed);
        }
    }

    fn handle_control_key(&mut self, key: Keycode) -> Result<(), crate::synth::EngineError> {
        match key {
            Keycode::Comma => {
                self.algorithm = (self.algorithm + ALGORITHM_COUNT - 1) % ALGORITHM_COUNT;
                log::info!(target: "ottofm::input", "algorithm {}", self.algorithm);
                self.controller.send(Action::Algorithm(self.algorithm))
            }
            Keycode::Dot => {
                self.algorithm = (self.algorithm + 1) % ALGORITHM_COUNT;
                log::info!(target: "ottofm::input", "algorithm {}", self.algorithm);
                self.controller.send(Action::Algorithm(self.algorithm))
            }
            Keycode::Minus | Keycode::Equal if !self.presets.is_empty() => {
                let count = self.presets.len();
                let step = if key == Keycode::Equal { 1 } else { count - 1 };
                let id = (self.presets.current_preset() + step) % count;
                self.presets.apply_preset(&mut self.controller, id)
            }
            Keycode::Key1 => self.controller.send(Action::CurrentOperator(0)),
            Keycode::Key2 => self.controller.send(Action::CurrentOperator(1)),
            Keycode::Key3 => self.controller.send(Action::CurrentOperator(2)),
            Keycode::Key4 => self.controller.send(Action::CurrentOperator(3)),
            Keycode::Escape => {
                log::info!(target: "ottofm::input", "all notes off");
                self.controller.send(Action::AllNotesOff)
            }
            _ => Ok(()),
        }
    }
}

use super::action::{Action, ActionSink, OperatorParam};
use super::error::EngineError;

/// A named list of parameter changes. Applying a preset only ever goes through
/// [`Action`]s, so it works the same on the engine and on a [`Controller`](super::Controller).
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub actions: &'static [Action],
}

pub static FACTORY_PRESETS: &[Preset] = &[
    Preset {
        name: "Init",
        actions: &[
            Action::Algorithm(0),
            Action::FmAmount(1.0),
            Action::Attack(0.1),
            Action::Decay(0.15),
            Action::Sustain(0.7),
            Action::Release(0.5),
        ],
    },
    Preset {
        name: "E. Piano",
        actions: &[
            Action::Algorithm(5),
            Action::FmAmount(0.6),
            Action::operator(0, OperatorParam::RatioIndex(5)),
            Action::operator(1, OperatorParam::RatioIndex(13)),
            Action::operator(2, OperatorParam::RatioIndex(5)),
            Action::operator(3, OperatorParam::RatioIndex(5)),
            Action::operator(1, OperatorParam::OutputLevel(0.4)),
            Action::operator(3, OperatorParam::OutputLevel(0.7)),
            Action::operator(1, OperatorParam::SustainPosition(0.2)),
            Action::operator(1, OperatorParam::DecayRelease(0.3)),
            Action::operator(2, OperatorParam::Detune(0.05)),
            Action::Attack(0.0),
            Action::Decay(0.6),
            Action::Sustain(0.4),
            Action::Release(0.35),
        ],
    },
    Preset {
        name: "Bell",
        actions: &[
            Action::Algorithm(3),
            Action::FmAmount(0.8),
            Action::operator(1, OperatorParam::RatioIndex(12)),
            Action::operator(3, OperatorParam::RatioIndex(16)),
            Action::operator(3, OperatorParam::OutputLevel(0.5)),
            Action::operator(3, OperatorParam::SustainPosition(0.0)),
            Action::operator(3, OperatorParam::DecayRelease(0.8)),
            Action::Attack(0.0),
            Action::Decay(0.9),
            Action::Sustain(0.0),
            Action::Release(0.6),
        ],
    },
    Preset {
        name: "Growl Bass",
        actions: &[
            Action::Algorithm(0),
            Action::FmAmount(1.0),
            Action::operator(0, OperatorParam::Feedback(0.4)),
            Action::operator(0, OperatorParam::RatioIndex(2)),
            Action::operator(1, OperatorParam::RatioIndex(5)),
            Action::operator(2, OperatorParam::OutputLevel(0.6)),
            Action::operator(1, OperatorParam::Attack(0.3)),
            Action::Attack(0.0),
            Action::Decay(0.3),
            Action::Sustain(0.8),
            Action::Release(0.1),
        ],
    },
    Preset {
        name: "Organ",
        actions: &[
            Action::Algorithm(10),
            Action::operator(0, OperatorParam::RatioIndex(2)),
            Action::operator(1, OperatorParam::RatioIndex(5)),
            Action::operator(2, OperatorParam::RatioIndex(9)),
            Action::operator(3, OperatorParam::RatioIndex(11)),
            Action::operator(2, OperatorParam::OutputLevel(0.5)),
            Action::operator(3, OperatorParam::OutputLevel(0.3)),
            Action::Attack(0.05),
            Action::Decay(0.0),
            Action::Sustain(1.0),
            Action::Release(0.1),
        ],
    },
];

/// Preset selection state for one engine, as seen by the UI.
#[derive(Debug, Clone)]
pub struct PresetSelector {
    presets: &'static [Preset],
    current: usize,
}

impl PresetSelector {
    pub fn new(presets: &'static [Preset]) -> Self {
        Self {
            presets,
            current: 0,
        }
    }

    pub fn current_preset(&self) -> usize {
        self.current
    }

    /// Display name of the current preset.
    pub fn name(&self) -> &'static str {
        self.presets.get(self.current).map_or("", |p| p.name)
    }

    pub fn preset_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.iter().map(|p| p.name)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Sends every action of preset `id` to `sink` and makes it current.
    pub fn apply_preset<S: ActionSink>(
        &mut self,
        sink: &mut S,
        id: usize,
    ) -> Result<(), EngineError> {
        let preset = self.presets.get(id).ok_or(EngineError::UnknownPreset(id))?;
        for action in preset.actions {
            sink.send(*action)?;
        }
        self.current = id;
        log::info!(target: "ottofm::preset", "applied preset {} ({})", id, preset.name);
        Ok(())
    }
}

impl Default for PresetSelector {
    fn default() -> Self {
        Self::new(FACTORY_PRESETS)
    }
}

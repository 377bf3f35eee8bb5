//! Parameter routing.
//!
//! Every parameter change is one [`Action`]: a tag plus a single value. Actions
//! are handed to the broadest entity (the [`Engine`](super::Engine)), which passes
//! them down first. Each [`ActionReceiver`] matches only the tags it owns and
//! answers [`Dispatch::Ignored`] for everything else, so the narrowest owner
//! wins and unowned tags fall through to the next broader scope. Adding a
//! parameter means adding a variant and one match arm in the entity that owns it.

use super::error::EngineError;

/// A change to one operator parameter. The operator is chosen by the
/// enclosing [`Action::Operator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorParam {
    Feedback(f32),
    /// Normalized attack, mapped to `3a² + 0.005` seconds.
    Attack(f32),
    SustainPosition(f32),
    DecayRelease(f32),
    /// Normalized detune, scaled by 25 Hz.
    Detune(f32),
    RatioIndex(usize),
    OutputLevel(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Operator scope. `op` selects the operator within each voice.
    Operator { op: usize, param: OperatorParam },

    // Voice scope (master envelope, normalized inputs).
    Attack(f32),
    Decay(f32),
    Sustain(f32),
    Release(f32),
    /// FM depth, broadcast to all four operators.
    FmAmount(f32),

    // Pool scope.
    /// Releases every sounding voice.
    AllNotesOff,

    // Engine scope.
    Algorithm(usize),
    /// Operator currently shown by the UI.
    CurrentOperator(usize),
    NoteOn { note: u8, frequency: f32 },
    NoteOff { note: u8 },
}

impl Action {
    pub const fn operator(op: usize, param: OperatorParam) -> Self {
        Action::Operator { op, param }
    }
}

/// Outcome of offering an action to a receiver.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Ignored,
}

impl Dispatch {
    pub fn is_handled(self) -> bool {
        self == Dispatch::Handled
    }

    /// Falls through to the next broader scope when nothing handled the action.
    pub fn or_else(self, f: impl FnOnce() -> Dispatch) -> Dispatch {
        match self {
            Dispatch::Handled => Dispatch::Handled,
            Dispatch::Ignored => f(),
        }
    }
}

/// An entity that owns some set of parameter tags.
pub trait ActionReceiver {
    fn action(&mut self, action: Action) -> Dispatch;
}

/// Somewhere actions can be sent: the engine itself, or a control-side handle.
pub trait ActionSink {
    fn send(&mut self, action: Action) -> Result<(), EngineError>;
}

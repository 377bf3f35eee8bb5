use rtrb::Producer;

use super::action::{Action, ActionSink};
use super::error::EngineError;
use super::meter::ActivityMeters;
use super::prelude::Arc;

/// Control-thread handle to a running [`Engine`](super::Engine).
///
/// Actions are queued without blocking and take effect at the start of the
/// next rendered block. Activity meters can be read at any time.
pub struct Controller {
    actions: Producer<Action>,
    meters: Arc<ActivityMeters>,
}

impl Controller {
    pub(crate) fn new(actions: Producer<Action>, meters: Arc<ActivityMeters>) -> Self {
        Self { actions, meters }
    }

    pub fn note_on(&mut self, note: u8, frequency: f32) -> Result<(), EngineError> {
        self.send(Action::NoteOn { note, frequency })
    }

    pub fn note_off(&mut self, note: u8) -> Result<(), EngineError> {
        self.send(Action::NoteOff { note })
    }

    /// Activity of operator `op_index` in the last triggered voice, in [0, 1].
    pub fn activity_level(&self, op_index: usize) -> f32 {
        self.meters.activity_level(op_index)
    }

    pub fn meters(&self) -> Arc<ActivityMeters> {
        Arc::clone(&self.meters)
    }

    /// Free slots left in the action queue.
    pub fn capacity_left(&self) -> usize {
        self.actions.slots()
    }
}

impl ActionSink for Controller {
    fn send(&mut self, action: Action) -> Result<(), EngineError> {
        self.actions.push(action).map_err(|_| {
            log::warn!(target: "ottofm::engine", "action queue full, dropped {:?}", action);
            EngineError::QueueFull
        })
    }
}

/// Errors reported on the control side. The render path never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    InvalidConfig(String),
    /// The action queue is full; the render side has not drained it yet.
    QueueFull,
    UnknownPreset(usize),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidConfig(msg) => write!(f, "Invalid engine config: {}", msg),
            EngineError::QueueFull => write!(f, "Action queue is full"),
            EngineError::UnknownPreset(id) => write!(f, "Unknown preset {}", id),
        }
    }
}

impl std::error::Error for EngineError {}

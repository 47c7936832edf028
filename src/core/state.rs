// core/state.rs

// Motion authorization state recorded by the proximity guard. Only the guard's
// move requests change it; everything else just reads it.

// Dependencies
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last authorization decision of the proximity guard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafetyState {
    /// No motion authorized (initial state, obstacle seen, or robot offline)
    #[default]
    Stopped,
    /// A motion command was issued after a clear check
    Moving,
}

impl SafetyState {
    /// True when the last request was authorized
    pub fn is_moving(self) -> bool {
        self == SafetyState::Moving
    }
}

impl fmt::Display for SafetyState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SafetyState::Stopped => write!(f, "STOPPED"),
            SafetyState::Moving => write!(f, "MOVING"),
        }
    }
}

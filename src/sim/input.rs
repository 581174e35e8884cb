//! Input Snapshot
//!
//! The polling collaborator samples its devices once per frame and hands
//! the simulation this snapshot. The simulation never polls anything
//! itself; the same snapshot applies for the whole frame.

use serde::{Deserialize, Serialize};

/// One frame of hero input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    /// Move-left held down this frame.
    pub left: bool,
    /// Move-right held down this frame.
    pub right: bool,
    /// Jump freshly pressed this frame. Edge-triggered: the poller sets
    /// this only on the press transition, not while the key is held.
    pub jump: bool,
}

impl InputState {
    /// Snapshot with nothing pressed.
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        jump: false,
    };

    /// Snapshot holding left.
    pub fn hold_left() -> Self {
        Self {
            left: true,
            ..Self::IDLE
        }
    }

    /// Snapshot holding right.
    pub fn hold_right() -> Self {
        Self {
            right: true,
            ..Self::IDLE
        }
    }

    /// Snapshot with a fresh jump press.
    pub fn press_jump() -> Self {
        Self {
            jump: true,
            ..Self::IDLE
        }
    }
}

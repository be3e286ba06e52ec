//! Per-frame input snapshot handed to the simulation.

use crate::geometry::Vector2;

/// Everything the simulation reads from the input devices for one frame.
/// Held flags are level-triggered; `*_pressed` flags are true only on the
/// frame the key went down.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire key or primary mouse button held.
    pub fire: bool,
    /// Cursor position in arena coordinates.
    pub cursor: Vector2,
    pub pause_pressed: bool,
    pub confirm_pressed: bool,
    pub menu_pressed: bool,
}

impl FrameInput {
    pub fn idle_at(cursor: Vector2) -> Self {
        FrameInput {
            cursor,
            ..Default::default()
        }
    }
}

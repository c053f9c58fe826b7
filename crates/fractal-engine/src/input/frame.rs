use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton, MouseWheelDelta, TextEvent};

/// Per-frame input deltas.
///
/// `InputState` holds what is currently down; `InputFrame` holds what happened
/// since the last presented frame. The runtime clears it after each frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Text committed this frame.
    pub text: Vec<TextEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.text.clear();
    }

    /// Wheel deltas received this frame, in arrival order.
    pub fn wheel_deltas(&self) -> impl Iterator<Item = MouseWheelDelta> + '_ {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::MouseWheel(d) => Some(*d),
            _ => None,
        })
    }
}

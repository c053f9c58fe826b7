use fractal_engine::input::{InputState, Key};

use crate::viewport::ControlInput;

/// Keys driving the viewport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub forward: Key,
    pub left: Key,
    pub back: Key,
    pub right: Key,
    pub zoom_in: Key,
    pub zoom_out: Key,
    pub exit: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            left: Key::A,
            back: Key::S,
            right: Key::D,
            zoom_in: Key::ArrowUp,
            zoom_out: Key::ArrowDown,
            exit: Key::Escape,
        }
    }
}

impl KeyBindings {
    /// Held-key snapshot for this frame.
    pub fn sample(&self, input: &InputState) -> ControlInput {
        ControlInput {
            focused: input.focused,
            forward: input.key_down(self.forward),
            left: input.key_down(self.left),
            back: input.key_down(self.back),
            right: input.key_down(self.right),
            zoom_in: input.key_down(self.zoom_in),
            zoom_out: input.key_down(self.zoom_out),
            exit: input.key_down(self.exit),
        }
    }
}

use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, MouseButton};

/// Current input state for the window.
///
/// Holds "is down" sets, focus, and pointer position. Per-frame transitions are
/// recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window holds input focus.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn new(focused: bool) -> Self {
        Self { focused, ..Self::default() }
    }

    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release events for keys held during focus loss never arrive.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                KeyState::Pressed => {
                    if self.buttons_down.insert(*button) {
                        frame.buttons_pressed.insert(*button);
                    }
                }
                KeyState::Released => {
                    if self.buttons_down.remove(button) {
                        frame.buttons_released.insert(*button);
                    }
                }
            },

            InputEvent::Text(t) => frame.text.push(t.clone()),

            InputEvent::MouseWheel(_) => {}
        }

        frame.events.push(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TextEvent;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn key_press_and_release_are_tracked() {
        let mut state = InputState::new(true);
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed));
        assert!(state.key_down(Key::W));
        assert!(frame.keys_pressed.contains(&Key::W));

        state.apply_event(&mut frame, key(Key::W, KeyState::Released));
        assert!(!state.key_down(Key::W));
        assert!(frame.keys_released.contains(&Key::W));
    }

    #[test]
    fn key_repeat_is_not_a_new_press() {
        let mut state = InputState::new(true);
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, InputEvent::Key { key: Key::A, state: KeyState::Pressed, repeat: true });
        assert!(frame.keys_pressed.is_empty());
        assert!(state.key_down(Key::A));
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut state = InputState::new(true);
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed));
        state.apply_event(&mut frame, InputEvent::PointerButton { button: MouseButton::Left, state: KeyState::Pressed });

        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.focused);
        assert!(state.keys_down.is_empty());
        assert!(state.buttons_down.is_empty());
    }

    #[test]
    fn text_and_wheel_land_in_frame() {
        let mut state = InputState::new(true);
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Text(TextEvent { text: "42".into() }));
        state.apply_event(&mut frame, InputEvent::MouseWheel(crate::input::MouseWheelDelta::Line { x: 0.0, y: -1.0 }));

        assert_eq!(frame.text.len(), 1);
        let wheel: Vec<_> = frame.wheel_deltas().collect();
        assert_eq!(wheel.len(), 1);
        assert_eq!(wheel[0].lines_y(), -1.0);

        frame.clear();
        assert!(frame.events.is_empty() && frame.text.is_empty());
    }
}

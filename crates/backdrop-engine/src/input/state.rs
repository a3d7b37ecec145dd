use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key};

/// Input state that persists across frames.
#[derive(Debug, Default)]
pub struct InputState {
    /// Last pointer position in logical pixels; `None` once it leaves the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Folds one event into the held state and records its edge in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            // A release delivered to another window would leave the key stuck.
            InputEvent::Focused(false) => self.keys_down.clear(),
            InputEvent::Focused(true) => {}

            InputEvent::PointerMoved { x, y } => {
                self.pointer_pos = Some((x, y));
                frame.pointer_moved = true;
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, pressed: true, repeat } => {
                if self.keys_down.insert(key) {
                    frame.keys_pressed.insert(key);
                } else if repeat {
                    frame.keys_repeated.insert(key);
                }
            }

            InputEvent::Key { key, pressed: false, .. } => {
                self.keys_down.remove(&key);
            }

            InputEvent::Wheel(delta) => frame.add_scroll(delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{WheelDelta, LINE_HEIGHT_PX};

    fn key(key: Key, pressed: bool, repeat: bool) -> InputEvent {
        InputEvent::Key { key, pressed, repeat }
    }

    #[test]
    fn press_repeat_and_release() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::PageDown, true, false));
        state.apply_event(&mut frame, key(Key::PageDown, true, true));
        assert!(frame.keys_pressed.contains(&Key::PageDown));
        assert!(frame.keys_repeated.contains(&Key::PageDown));
        assert!(state.keys_down.contains(&Key::PageDown));

        frame.clear();
        state.apply_event(&mut frame, key(Key::PageDown, false, false));
        assert!(!frame.key_hit(Key::PageDown));
        assert!(!state.keys_down.contains(&Key::PageDown));
    }

    #[test]
    fn held_key_without_repeat_flag_is_not_a_hit() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::ArrowDown, true, false));
        frame.clear();
        state.apply_event(&mut frame, key(Key::ArrowDown, true, false));
        assert!(!frame.key_hit(Key::ArrowDown));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Space, true, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());
    }

    #[test]
    fn wheel_lines_and_pixels_accumulate() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Wheel(WheelDelta::Lines { x: 0.0, y: -2.0 }));
        state.apply_event(&mut frame, InputEvent::Wheel(WheelDelta::Pixels { x: 3.0, y: 15.0 }));
        assert_eq!(frame.scroll_delta, (3.0, -2.0 * LINE_HEIGHT_PX + 15.0));

        frame.clear();
        assert_eq!(frame.scroll_delta, (0.0, 0.0));
    }

    #[test]
    fn pointer_leave_forgets_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 4.0, y: 5.0 });
        assert_eq!(state.pointer_pos, Some((4.0, 5.0)));
        assert!(frame.pointer_moved);

        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }
}

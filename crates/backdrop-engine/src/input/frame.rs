use std::collections::HashSet;

use super::types::{Key, WheelDelta};

/// What changed since the last rendered frame.
///
/// [`InputState`](super::InputState) holds what is currently down; this holds
/// the edges and accumulated deltas, and is cleared after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    /// Keys pressed again by auto-repeat this frame.
    pub keys_repeated: HashSet<Key>,

    /// Accumulated wheel scroll in logical pixels, `(x, y)`, winit's sign convention.
    pub scroll_delta: (f32, f32),

    pub pointer_moved: bool,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_repeated.clear();
        self.scroll_delta = (0.0, 0.0);
        self.pointer_moved = false;
    }

    pub(crate) fn add_scroll(&mut self, delta: WheelDelta) {
        let (dx, dy) = delta.to_pixels();
        self.scroll_delta.0 += dx;
        self.scroll_delta.1 += dy;
    }

    /// True if `key` went down this frame, including auto-repeat.
    pub fn key_hit(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key) || self.keys_repeated.contains(&key)
    }
}

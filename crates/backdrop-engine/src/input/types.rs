//! Platform-agnostic input vocabulary.

/// Logical pixels scrolled per wheel notch.
pub const LINE_HEIGHT_PX: f32 = 40.0;

/// Keys the visualizer binds. Everything else arrives as `Key::Other`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    /// Top-row or keypad digit, `0..=9`.
    Digit(u8),
    Other,
}

impl Key {
    #[inline]
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) => Some(d),
            _ => None,
        }
    }
}

/// Wheel movement as the platform reports it.
///
/// `Lines` comes from notched wheels, `Pixels` from touchpads (logical px).
/// Positive `y` moves content down, i.e. the user scrolled up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Lines { x: f32, y: f32 },
    Pixels { x: f32, y: f32 },
}

impl WheelDelta {
    pub fn to_pixels(self) -> (f32, f32) {
        match self {
            WheelDelta::Lines { x, y } => (x * LINE_HEIGHT_PX, y * LINE_HEIGHT_PX),
            WheelDelta::Pixels { x, y } => (x, y),
        }
    }
}

/// Input events emitted by the runtime, already in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    /// Pointer left the window surface.
    PointerLeft,
    Wheel(WheelDelta),
    Key { key: Key, pressed: bool, repeat: bool },
    Focused(bool),
}

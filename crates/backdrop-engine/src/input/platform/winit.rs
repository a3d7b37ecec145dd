use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::input::{InputEvent, Key, WheelDelta};

/// Maps a winit event onto an [`InputEvent`], converting positions to logical px.
///
/// `None` for events the visualizer does not listen to.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::Focused(focused) => InputEvent::Focused(*focused),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(window, *position);
            InputEvent::PointerMoved { x, y }
        }
        WindowEvent::MouseWheel { delta, .. } => InputEvent::Wheel(match *delta {
            MouseScrollDelta::LineDelta(x, y) => WheelDelta::Lines { x, y },
            MouseScrollDelta::PixelDelta(p) => {
                let (x, y) = logical(window, p);
                WheelDelta::Pixels { x, y }
            }
        }),
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: map_key(event.physical_key),
            pressed: event.state == ElementState::Pressed,
            repeat: event.repeat,
        },
        _ => return None,
    };
    Some(ev)
}

fn logical(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let p = pos.to_logical::<f64>(window.scale_factor());
    (p.x as f32, p.y as f32)
}

fn map_key(key: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = key else {
        return Key::Other;
    };
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        other => digit(other).map_or(Key::Other, Key::Digit),
    }
}

fn digit(code: KeyCode) -> Option<u8> {
    let d = match code {
        KeyCode::Digit0 | KeyCode::Numpad0 => 0,
        KeyCode::Digit1 | KeyCode::Numpad1 => 1,
        KeyCode::Digit2 | KeyCode::Numpad2 => 2,
        KeyCode::Digit3 | KeyCode::Numpad3 => 3,
        KeyCode::Digit4 | KeyCode::Numpad4 => 4,
        KeyCode::Digit5 | KeyCode::Numpad5 => 5,
        KeyCode::Digit6 | KeyCode::Numpad6 => 6,
        KeyCode::Digit7 | KeyCode::Numpad7 => 7,
        KeyCode::Digit8 | KeyCode::Numpad8 => 8,
        KeyCode::Digit9 | KeyCode::Numpad9 => 9,
        _ => return None,
    };
    Some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypad_and_top_row_digits_agree() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Digit4)), Key::Digit(4));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Numpad4)), Key::Digit(4));
    }

    #[test]
    fn unbound_keys_are_other() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Other);
    }
}

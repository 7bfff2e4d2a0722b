/// Frame-scoped input accumulation
use std::collections::HashSet;

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),

    /// Absolute cursor position in window pixels.
    CursorMoved { x: f32, y: f32 },
    /// Relative device motion, reported even when the cursor is captured.
    RawMotion { dx: f32, dy: f32 },
    MouseButton { button: MouseButton, pressed: bool },
    Scroll { dx: f32, dy: f32 },

    FocusLost,
}

/// Keyboard and mouse state for the current frame.
///
/// Motion and scroll deltas accumulate over every event between two
/// `end_frame` calls. Mouse Y grows upward: moving the cursor up yields a
/// positive delta.
#[derive(Debug, Clone)]
pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
    pressed_buttons: HashSet<MouseButton>,
    mouse_position: Vec2,
    last_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
    first_move: bool,
    cursor_captured: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl InputState {
    pub fn new(width: u32, height: u32) -> Self {
        let centre = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        Self {
            pressed_keys: HashSet::new(),
            pressed_buttons: HashSet::new(),
            mouse_position: centre,
            last_position: centre,
            mouse_delta: Vec2::ZERO,
            scroll_delta: Vec2::ZERO,
            first_move: true,
            cursor_captured: false,
        }
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.on_key(*key, true),
            InputEvent::KeyUp(key) => self.on_key(*key, false),
            InputEvent::CursorMoved { x, y } => {
                // a captured cursor reports through raw motion instead
                if !self.cursor_captured {
                    self.on_motion(*x, *y);
                }
            }
            InputEvent::RawMotion { dx, dy } => {
                if self.cursor_captured {
                    self.on_raw_motion(*dx, *dy);
                }
            }
            InputEvent::MouseButton { button, pressed } => self.on_mouse_button(*button, *pressed),
            InputEvent::Scroll { dx, dy } => self.on_scroll(*dx, *dy),
            InputEvent::FocusLost => self.clear_keys(),
        }
    }

    pub fn on_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed_keys.insert(key);
        } else {
            self.pressed_keys.remove(&key);
        }
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.pressed_buttons.insert(button);
        } else {
            self.pressed_buttons.remove(&button);
        }
    }

    /// Cursor moved to (`x`, `y`). The first call only seeds the position.
    pub fn on_motion(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        if self.first_move {
            self.first_move = false;
        } else {
            self.mouse_delta += Vec2::new(x - self.last_position.x, self.last_position.y - y);
        }
        self.last_position = position;
        self.mouse_position = position;
    }

    /// Relative motion while captured, applied to a virtual cursor.
    pub fn on_raw_motion(&mut self, dx: f32, dy: f32) {
        let target = self.mouse_position + Vec2::new(dx, dy);
        self.on_motion(target.x, target.y);
    }

    pub fn on_scroll(&mut self, dx: f32, dy: f32) {
        self.scroll_delta += Vec2::new(dx, dy);
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
        self.pressed_buttons.clear();
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    pub fn is_cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    /// Switch between absolute and raw motion. Re-capturing the cursor
    /// reseeds the position so the first motion does not jump the view.
    pub fn set_cursor_captured(&mut self, captured: bool) {
        if captured && !self.cursor_captured {
            self.reset_first_move();
        }
        self.cursor_captured = captured;
    }

    pub fn reset_first_move(&mut self) {
        self.first_move = true;
    }

    /// Zero the per-frame deltas. Call once per frame before polling events.
    pub fn end_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub toggle_cursor: KeyCode,
    pub exit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::KeyE,
            down: KeyCode::KeyQ,
            toggle_cursor: KeyCode::AltLeft,
            exit: KeyCode::Escape,
        }
    }
}

/// winit event conversion
pub mod native {
    use super::*;
    use winit::event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent};
    use winit::keyboard::PhysicalKey;

    /// Pixels per scroll line, for touchpads that report pixel deltas.
    const PIXELS_PER_LINE: f32 = 40.0;

    pub fn from_window_event(event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                if event.repeat {
                    return None;
                }
                Some(match event.state {
                    ElementState::Pressed => InputEvent::KeyDown(code),
                    ElementState::Released => InputEvent::KeyUp(code),
                })
            }
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
                button: *button,
                pressed: *state == ElementState::Pressed,
            }),
            WindowEvent::MouseWheel { delta, .. } => Some(scroll_to_input(delta)),
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            _ => None,
        }
    }

    pub fn from_device_event(event: &DeviceEvent) -> Option<InputEvent> {
        match event {
            DeviceEvent::MouseMotion { delta } => Some(InputEvent::RawMotion {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            }),
            _ => None,
        }
    }

    pub fn scroll_to_input(delta: &MouseScrollDelta) -> InputEvent {
        match delta {
            MouseScrollDelta::LineDelta(dx, dy) => InputEvent::Scroll { dx: *dx, dy: *dy },
            MouseScrollDelta::PixelDelta(pos) => InputEvent::Scroll {
                dx: pos.x as f32 / PIXELS_PER_LINE,
                dy: pos.y as f32 / PIXELS_PER_LINE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_motion_only_seeds_position() {
        let mut input = InputState::new(800, 600);
        input.on_motion(100.0, 100.0);
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.mouse_position(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_motion_accumulates_with_y_inverted() {
        let mut input = InputState::new(800, 600);
        input.on_motion(100.0, 100.0);
        input.on_motion(110.0, 95.0);
        input.on_motion(113.0, 99.0);
        // (10, 5) + (3, -4)
        assert_eq!(input.mouse_delta(), Vec2::new(13.0, 1.0));
    }

    #[test]
    fn test_end_frame_resets_deltas_only() {
        let mut input = InputState::new(800, 600);
        input.on_motion(0.0, 0.0);
        input.on_motion(5.0, 5.0);
        input.on_scroll(0.0, 2.0);
        input.on_key(KeyCode::KeyW, true);
        input.end_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.scroll_delta(), Vec2::ZERO);
        assert_eq!(input.mouse_position(), Vec2::new(5.0, 5.0));
        assert!(input.is_key_pressed(KeyCode::KeyW));
        // not a first move any more
        input.on_motion(6.0, 5.0);
        assert_eq!(input.mouse_delta(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_scroll_accumulates() {
        let mut input = InputState::default();
        input.on_scroll(0.0, 1.0);
        input.on_scroll(0.5, -3.0);
        assert_eq!(input.scroll_delta(), Vec2::new(0.5, -2.0));
    }

    #[test]
    fn test_capture_selects_motion_source() {
        let mut input = InputState::new(800, 600);
        input.process_event(&InputEvent::CursorMoved { x: 10.0, y: 10.0 });
        input.process_event(&InputEvent::CursorMoved { x: 20.0, y: 10.0 });
        assert_eq!(input.mouse_delta(), Vec2::new(10.0, 0.0));

        input.set_cursor_captured(true);
        input.end_frame();
        input.process_event(&InputEvent::CursorMoved { x: 500.0, y: 500.0 });
        input.process_event(&InputEvent::RawMotion { dx: 3.0, dy: 3.0 });
        assert_eq!(input.mouse_delta(), Vec2::ZERO, "first captured motion reseeds");
        input.process_event(&InputEvent::RawMotion { dx: 4.0, dy: -2.0 });
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_focus_lost_releases_keys() {
        let mut input = InputState::default();
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyA));
        input.process_event(&InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        input.process_event(&InputEvent::FocusLost);
        assert!(!input.is_key_pressed(KeyCode::KeyA));
        assert!(!input.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_pixel_scroll_is_scaled_to_lines() {
        let delta = winit::event::MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, 80.0));
        assert_eq!(native::scroll_to_input(&delta), InputEvent::Scroll { dx: 0.0, dy: 2.0 });
    }
}

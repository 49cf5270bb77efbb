//! Window input to camera input
//!
//! [`CameraController`] turns winit window events into a
//! [`fractal::CameraInput`] accumulator:
//!
//! - left drag rotates the model
//! - right drag orbits the eye, or looks around in first person
//! - the wheel zooms
//! - W/A/S/D, Space and left Shift move in first person

use fractal::CameraInput;
use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Wheel notches per pixel of precise (touchpad) scrolling.
const PIXELS_PER_NOTCH: f64 = 50.0;

#[derive(Debug, Default)]
pub struct CameraController {
    left_pressed: bool,
    right_pressed: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl CameraController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process keyboard events to update held movement keys
    ///
    /// Returns `true` if `keycode` is a movement key.
    pub fn process_keyboard(
        &mut self,
        keycode: KeyCode,
        state: ElementState,
        input: &mut CameraInput,
    ) -> bool {
        let is_pressed = state == ElementState::Pressed;
        let keys = &mut input.movement;
        match keycode {
            KeyCode::KeyW => keys.forward = is_pressed,
            KeyCode::KeyA => keys.left = is_pressed,
            KeyCode::KeyS => keys.backward = is_pressed,
            KeyCode::KeyD => keys.right = is_pressed,
            KeyCode::Space => keys.up = is_pressed,
            KeyCode::ShiftLeft => keys.down = is_pressed,
            _ => return false,
        }
        true
    }

    /// Feed one window event. Returns `true` if it was consumed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn process_event(&mut self, event: &WindowEvent, input: &mut CameraInput) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state,
                        ..
                    },
                ..
            } => self.process_keyboard(*keycode, *state, input),
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.left_pressed = pressed,
                    MouseButton::Right => self.right_pressed = pressed,
                    _ => return false,
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.last_cursor {
                    let delta = Vec2::new((position.x - last.x) as f32, (position.y - last.y) as f32);
                    if self.left_pressed {
                        input.rotate_model += delta;
                    }
                    if self.right_pressed {
                        input.orbit += delta;
                    }
                }
                self.last_cursor = Some(*position);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
                false
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered to unfocused windows.
                self.left_pressed = false;
                self.right_pressed = false;
                input.movement = fractal::MovementKeys::default();
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                input.zoom += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_NOTCH) as f32,
                };
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_follow_press_and_release() {
        let mut controller = CameraController::new();
        let mut input = CameraInput::default();

        assert!(controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed, &mut input));
        assert!(input.movement.forward);
        controller.process_keyboard(KeyCode::KeyW, ElementState::Released, &mut input);
        assert!(!input.movement.forward);

        assert!(controller.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed, &mut input));
        assert!(input.movement.down);
        assert!(!controller.process_keyboard(KeyCode::KeyT, ElementState::Pressed, &mut input));
    }
}

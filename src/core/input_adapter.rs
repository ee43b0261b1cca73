use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};
use super::scroll::ScrollInput;

/// Adapter that bridges Winit events to the Controller trait
///
/// Pointer motion accumulates between frames; scroll gestures are handed back
/// to the caller immediately so the page can react at native event rate.
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Current cursor position (relative to window)
    cursor_position: Option<(f32, f32)>,
    /// Cursor movement since last reset
    pointer_delta: (f32, f32),
}

impl WinitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent; returns a scroll gesture if the event was one
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<ScrollInput> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let button = Self::keycode_to_button(keycode)?;
                self.set_pressed(button, event.state);

                // Held keys keep scrolling through auto-repeat
                (event.state == ElementState::Pressed && button != Button::Escape)
                    .then_some(ScrollInput::Key(button))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    self.set_pressed(btn, *state);
                }
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x as f32, position.y as f32);
                if let Some(old_pos) = self.cursor_position {
                    self.pointer_delta.0 += new_pos.0 - old_pos.0;
                    self.pointer_delta.1 += new_pos.1 - old_pos.1;
                }
                self.cursor_position = Some(new_pos);
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_position = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => Some(ScrollInput::Lines(*y)),
                MouseScrollDelta::PixelDelta(position) => Some(ScrollInput::Pixels(position.y as f32)),
            },
            WindowEvent::Focused(false) => {
                // Releases are lost while unfocused
                self.pressed_keys.clear();
                None
            }
            _ => None,
        }
    }

    fn set_pressed(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(button);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&button);
            }
        }
    }

    /// Reset per-frame state (pointer delta)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.pointer_delta = (0.0, 0.0);
    }

    pub fn cursor_position(&self) -> Option<(f32, f32)> {
        self.cursor_position
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::ArrowUp => Some(Button::ArrowUp),
            KeyCode::ArrowDown => Some(Button::ArrowDown),
            KeyCode::PageUp => Some(Button::PageUp),
            KeyCode::PageDown => Some(Button::PageDown),
            KeyCode::Home => Some(Button::Home),
            KeyCode::End => Some(Button::End),
            KeyCode::Space => Some(Button::Space),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn pointer_delta(&self) -> (f32, f32) {
        self.pointer_delta
    }
}

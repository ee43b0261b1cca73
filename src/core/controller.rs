/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
    Escape,
}

/// Controller - button state plus pointer motion accumulated since the last frame
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Pointer movement in physical pixels since the last reset
    fn pointer_delta(&self) -> (f32, f32) {
        (0.0, 0.0)
    }
}

/// Controller with nothing pressed and no motion
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Controller for Idle {
    fn is_down(&self, _button: Button) -> bool {
        false
    }
}

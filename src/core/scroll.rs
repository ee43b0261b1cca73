use super::controller::Button;

/// Pixels moved by one arrow-key press
pub const ARROW_STEP: f32 = 40.0;

/// One scrolling gesture, before it is applied to the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollInput {
    /// Wheel notches; positive scrolls towards the top of the page
    Lines(f32),
    /// Precise touchpad motion; positive scrolls towards the top
    Pixels(f32),
    /// Keyboard scrolling
    Key(Button),
}

/// Vertical scroll position of a page taller than the viewport.
///
/// Stands in for the document the scene sits behind: the scroll handler
/// reads [`top`](Self::top), the page's top edge relative to the viewport,
/// which is 0 at rest and goes negative as the reader scrolls down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPage {
    offset: f32,
    page_height: f32,
    viewport_height: f32,
    wheel_step: f32,
}

impl ScrollPage {
    pub fn new(page_height: f32, viewport_height: f32, wheel_step: f32) -> Self {
        Self {
            offset: 0.0,
            page_height,
            viewport_height,
            wheel_step,
        }
    }

    /// Top edge of the page relative to the viewport
    pub fn top(&self) -> f32 {
        -self.offset
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        (self.page_height - self.viewport_height).max(0.0)
    }

    /// Re-clamp after the window changes height
    pub fn set_viewport_height(&mut self, height: f32) -> Option<f32> {
        self.viewport_height = height;
        self.scroll_to(self.offset)
    }

    /// Apply a gesture. Returns the new `top` only if the page actually moved,
    /// mirroring how a browser skips scroll events at the ends of the page.
    pub fn apply(&mut self, input: ScrollInput) -> Option<f32> {
        let target = match input {
            ScrollInput::Lines(lines) => self.offset - lines * self.wheel_step,
            ScrollInput::Pixels(pixels) => self.offset - pixels,
            ScrollInput::Key(Button::ArrowDown) => self.offset + ARROW_STEP,
            ScrollInput::Key(Button::ArrowUp) => self.offset - ARROW_STEP,
            ScrollInput::Key(Button::PageDown | Button::Space) => self.offset + self.viewport_height,
            ScrollInput::Key(Button::PageUp) => self.offset - self.viewport_height,
            ScrollInput::Key(Button::Home) => 0.0,
            ScrollInput::Key(Button::End) => self.max_offset(),
            ScrollInput::Key(_) => return None,
        };
        self.scroll_to(target)
    }

    pub fn scroll_to(&mut self, offset: f32) -> Option<f32> {
        let clamped = offset.clamp(0.0, self.max_offset());
        if clamped == self.offset {
            return None;
        }
        self.offset = clamped;
        Some(self.top())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ScrollPage {
        ScrollPage::new(4000.0, 1000.0, 100.0)
    }

    #[test]
    fn starts_at_top() {
        let page = page();
        assert_eq!(page.top(), 0.0);
        assert_eq!(page.max_offset(), 3000.0);
    }

    #[test]
    fn wheel_down_moves_top_negative() {
        let mut page = page();
        assert_eq!(page.apply(ScrollInput::Lines(-5.0)), Some(-500.0));
        assert_eq!(page.apply(ScrollInput::Pixels(120.0)), Some(-380.0));
    }

    #[test]
    fn no_event_when_pinned_at_an_end() {
        let mut page = page();
        assert_eq!(page.apply(ScrollInput::Lines(3.0)), None);
        assert_eq!(page.apply(ScrollInput::Key(Button::End)), Some(-3000.0));
        assert_eq!(page.apply(ScrollInput::Key(Button::PageDown)), None);
    }

    #[test]
    fn keyboard_steps() {
        let mut page = page();
        assert_eq!(page.apply(ScrollInput::Key(Button::ArrowDown)), Some(-ARROW_STEP));
        assert_eq!(page.apply(ScrollInput::Key(Button::Space)), Some(-ARROW_STEP - 1000.0));
        assert_eq!(page.apply(ScrollInput::Key(Button::PageUp)), Some(-ARROW_STEP));
        assert_eq!(page.apply(ScrollInput::Key(Button::Home)), Some(0.0));
        assert_eq!(page.apply(ScrollInput::Key(Button::Escape)), None);
    }

    #[test]
    fn short_page_never_scrolls() {
        let mut page = ScrollPage::new(600.0, 1000.0, 100.0);
        assert_eq!(page.max_offset(), 0.0);
        assert_eq!(page.apply(ScrollInput::Lines(-10.0)), None);
    }

    #[test]
    fn taller_viewport_reclamps() {
        let mut page = page();
        page.apply(ScrollInput::Key(Button::End));
        assert_eq!(page.set_viewport_height(2000.0), Some(-2000.0));
        assert_eq!(page.set_viewport_height(2000.0), None);
    }
}

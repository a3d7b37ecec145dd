//! Virtual page scrolling for the full-window background.
//!
//! The window stands in for a browser viewport over a tall page of stacked
//! sections. Wheel and keyboard input move a scroll offset; the viewport
//! reacts to it the way the page background reacts to real scrolling.

use backdrop_engine::input::{InputFrame, Key};
use backdrop_scene::{Section, SectionLayout};

/// Arrow-key scroll step in logical pixels.
pub const ARROW_STEP_PX: f32 = 40.0;
/// Fraction of the viewport scrolled by PageUp / PageDown / Space.
pub const PAGE_FRACTION: f32 = 0.9;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PageCommand {
    /// Scroll by a pixel offset; positive moves down the page.
    ScrollBy(f32),
    /// Scroll by a number of viewport pages.
    PageBy(f32),
    Top,
    Bottom,
    JumpTo(Section),
}

impl PageCommand {
    /// Commands for everything that happened this frame, in a stable order.
    pub fn from_input(frame: &InputFrame) -> Vec<PageCommand> {
        let mut cmds = Vec::new();

        // winit reports +y when the wheel moves content down, i.e. scrolling up.
        let (_, wheel_y) = frame.scroll_delta;
        if wheel_y != 0.0 {
            cmds.push(PageCommand::ScrollBy(-wheel_y));
        }

        if frame.key_hit(Key::ArrowDown) {
            cmds.push(PageCommand::ScrollBy(ARROW_STEP_PX));
        }
        if frame.key_hit(Key::ArrowUp) {
            cmds.push(PageCommand::ScrollBy(-ARROW_STEP_PX));
        }
        if frame.key_hit(Key::PageDown) || frame.key_hit(Key::Space) {
            cmds.push(PageCommand::PageBy(PAGE_FRACTION));
        }
        if frame.key_hit(Key::PageUp) {
            cmds.push(PageCommand::PageBy(-PAGE_FRACTION));
        }
        if frame.keys_pressed.contains(&Key::Home) {
            cmds.push(PageCommand::Top);
        }
        if frame.keys_pressed.contains(&Key::End) {
            cmds.push(PageCommand::Bottom);
        }

        let mut digits: Vec<u8> = frame.keys_pressed.iter().filter_map(|k| k.digit()).collect();
        digits.sort_unstable();
        for d in digits {
            if let Some(&section) = (d as usize).checked_sub(1).and_then(|i| Section::ALL.get(i)) {
                cmds.push(PageCommand::JumpTo(section));
            }
        }

        cmds
    }
}

/// Scroll offset over a [`SectionLayout`] sized for the current window.
#[derive(Debug, Clone)]
pub struct PageScroll {
    layout: SectionLayout,
    viewport_height: f32,
    scroll_y: f32,
}

impl PageScroll {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            layout: SectionLayout::for_viewport(viewport_height),
            viewport_height,
            scroll_y: 0.0,
        }
    }

    #[inline]
    pub fn layout(&self) -> &SectionLayout {
        &self.layout
    }

    #[inline]
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn max_scroll(&self) -> f32 {
        (self.layout.document_height() - self.viewport_height).max(0.0)
    }

    /// Rebuilds the layout for a new window height, keeping the same relative position.
    /// Returns `true` if the height changed.
    pub fn resize(&mut self, viewport_height: f32) -> bool {
        if viewport_height <= 0.0 || viewport_height == self.viewport_height {
            return false;
        }
        let ratio = match self.max_scroll() {
            m if m > 0.0 => self.scroll_y / m,
            _ => 0.0,
        };
        self.layout = SectionLayout::for_viewport(viewport_height);
        self.viewport_height = viewport_height;
        self.scroll_y = (ratio * self.max_scroll()).clamp(0.0, self.max_scroll());
        true
    }

    /// Applies one command. Returns `true` if the offset moved.
    pub fn apply(&mut self, cmd: PageCommand) -> bool {
        let target = match cmd {
            PageCommand::ScrollBy(dy) => self.scroll_y + dy,
            PageCommand::PageBy(pages) => self.scroll_y + pages * self.viewport_height,
            PageCommand::Top => 0.0,
            PageCommand::Bottom => self.max_scroll(),
            PageCommand::JumpTo(section) => match self.layout.band(section) {
                Some(band) => band.top,
                None => return false,
            },
        };
        let target = target.clamp(0.0, self.max_scroll());
        if target == self.scroll_y || !target.is_finite() {
            return false;
        }
        self.scroll_y = target;
        true
    }
}

//! Viewport and scroll offset management.

use glimpse_types::backend::Canvas;
use glimpse_types::config::BrowserConfig;
use glimpse_types::error::Result;

use crate::layout::{DisplayList, GlyphPlacement};

/// Scroll state for the page window.
///
/// The offset stays within `[0, max_offset()]`, where the maximum is the
/// viewport height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// Current vertical scroll offset in pixels.
    offset: i32,
    /// Pixels moved per scroll command.
    step: i32,
    /// Visible window height.
    height: i32,
    /// Line height. A glyph whose top edge is up to one line above the
    /// window is still drawn.
    vstep: i32,
}

impl Viewport {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            offset: 0,
            step: config.scroll_step,
            height: config.viewport_height(),
            vstep: config.vstep,
        }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn max_offset(&self) -> i32 {
        self.height
    }

    /// Move down one step. Returns `false`, leaving the offset alone, if
    /// the step would pass the maximum.
    pub fn scroll_down(&mut self) -> bool {
        self.scroll_by(self.step)
    }

    /// Move up one step. Returns `false`, leaving the offset alone, if
    /// the step would go above the top of the page.
    pub fn scroll_up(&mut self) -> bool {
        self.scroll_by(-self.step)
    }

    fn scroll_by(&mut self, delta: i32) -> bool {
        let target = self.offset + delta;
        if delta == 0 || !(0..=self.max_offset()).contains(&target) {
            return false;
        }
        self.offset = target;
        true
    }

    /// Back to the top of the page.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Whether a glyph at page coordinate `y` falls in the window.
    pub fn is_visible(&self, y: f32) -> bool {
        let top = (self.offset - self.vstep) as f32;
        let bottom = (self.offset + self.height) as f32;
        (top..=bottom).contains(&y)
    }

    /// Placements in the window, in display-list order.
    pub fn visible<'a>(
        &'a self,
        list: &'a DisplayList,
    ) -> impl Iterator<Item = &'a GlyphPlacement> + 'a {
        list.iter().filter(|g| self.is_visible(g.y))
    }

    /// Clear the canvas, draw the visible slice of `list` shifted up by the
    /// offset, and present. Returns the number of glyphs drawn.
    pub fn draw(&self, list: &DisplayList, canvas: &mut dyn Canvas) -> Result<usize> {
        canvas.clear()?;
        let mut drawn = 0;
        for g in self.visible(list) {
            let y = (g.y - self.offset as f32).round() as i32;
            canvas.draw_glyph(g.x, y, g.ch)?;
            drawn += 1;
        }
        canvas.present()?;
        log::trace!("drew {drawn} of {} glyphs at offset {}", list.len(), self.offset);
        Ok(drawn)
    }
}

//! Fixed-cell text layout.
//!
//! Every character occupies one `hstep`-wide cell. Lines wrap at the
//! right margin with no regard for word boundaries; a newline starts a
//! new paragraph 1.5 line heights further down.

use glimpse_types::config::BrowserConfig;

/// One character positioned on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub x: i32,
    /// Page y coordinate. Paragraph breaks can leave it on a half pixel.
    pub y: f32,
    pub ch: char,
}

/// Ordered placements for one page, built once per load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    glyphs: Vec<GlyphPlacement>,
}

impl DisplayList {
    pub fn iter(&self) -> std::slice::Iter<'_, GlyphPlacement> {
        self.glyphs.iter()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a GlyphPlacement;
    type IntoIter = std::slice::Iter<'a, GlyphPlacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.glyphs.iter()
    }
}

/// Place `text` on the cell grid described by `config`.
///
/// The cursor starts at `(hstep, vstep)`. Each character is recorded at
/// the cursor, which then advances one cell. When the cursor reaches
/// `width - hstep` it wraps to the left margin one line down. A newline
/// is recorded like any other character and moves the cursor to the left
/// margin 1.5 lines down.
pub fn layout<I>(text: I, config: &BrowserConfig) -> DisplayList
where
    I: IntoIterator<Item = char>,
{
    let hstep = config.hstep;
    let vstep = config.vstep as f32;
    let right_edge = config.width as i32 - hstep;
    let paragraph = config.paragraph_spacing();

    let mut glyphs = Vec::new();
    let (mut x, mut y) = (hstep, vstep);

    for ch in text {
        glyphs.push(GlyphPlacement { x, y, ch });

        if ch == '\n' {
            x = hstep;
            y += paragraph;
            continue;
        }

        x += hstep;
        if x >= right_edge {
            x = hstep;
            y += vstep;
        }
    }

    log::debug!("layout: {} glyphs, {}px tall", glyphs.len(), y);
    DisplayList { glyphs }
}

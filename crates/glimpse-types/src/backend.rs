//! Backend trait definitions.
//!
//! Every platform implements these traits. The browser dispatches all
//! drawing, input and socket I/O through trait boundaries -- it never
//! calls toolkit-specific APIs.

use crate::error::Result;
use crate::input::InputEvent;

/// The rendering boundary between the viewport renderer and the window
/// toolkit.
///
/// Coordinates are canvas pixels with the origin at the top-left corner.
pub trait Canvas {
    /// Initialize the drawing surface.
    fn init(&mut self, width: u32, height: u32) -> Result<()>;

    /// Erase everything drawn since the last clear.
    fn clear(&mut self) -> Result<()>;

    /// Draw a single glyph with its cell anchored at `(x, y)`.
    fn draw_glyph(&mut self, x: i32, y: i32, ch: char) -> Result<()>;

    /// Make the frame drawn since the last clear visible.
    fn present(&mut self) -> Result<()>;

    /// Release the drawing surface.
    fn shutdown(&mut self) -> Result<()>;
}

/// Input event source.
pub trait InputBackend {
    /// Drain pending events.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Block until at least one event arrives, then drain.
    fn wait_events(&mut self) -> Vec<InputEvent> {
        self.poll_events()
    }
}

/// A bidirectional byte stream (TCP connection, possibly TLS-wrapped).
pub trait NetworkStream: Send {
    /// Read into `buf`. `Ok(0)` means the peer closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn write(&mut self, data: &[u8]) -> Result<usize>;
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
    fn close(&mut self) -> Result<()>;
}

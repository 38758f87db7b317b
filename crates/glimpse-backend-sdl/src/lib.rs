//! SDL2 backend for Glimpse.
//!
//! Implements `Canvas` and `InputBackend` using SDL2. Glyphs are drawn from
//! an 8x8 bitmap font as black points on a white page.

mod font;

use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseWheelDirection;
use sdl2::pixels::Color;
use sdl2::rect::Point;
use sdl2::render::WindowCanvas;

use glimpse_types::backend::{Canvas, InputBackend};
use glimpse_types::error::{GlimpseError, Result};
use glimpse_types::input::InputEvent;

pub use font::{GLYPH_HEIGHT, GLYPH_WIDTH};

const PAGE_COLOR: Color = Color::RGB(255, 255, 255);
const INK_COLOR: Color = Color::RGB(0, 0, 0);

/// SDL2 window, renderer and event pump.
///
/// Created by [`SdlBackend::new`]; [`Canvas::init`] sizes and blanks the
/// window, [`Canvas::shutdown`] hides it. The SDL context is released on
/// drop.
pub struct SdlBackend {
    canvas: WindowCanvas,
    event_pump: EventPump,
    /// Reused across glyphs to avoid an allocation per draw call.
    points: Vec<Point>,
    initialized: bool,
}

impl SdlBackend {
    /// Create a new SDL2 backend with a window.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl = sdl2::init().map_err(|e| GlimpseError::Backend(e.to_string()))?;
        let video = sdl
            .video()
            .map_err(|e| GlimpseError::Backend(e.to_string()))?;
        let window = video
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| GlimpseError::Backend(e.to_string()))?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| GlimpseError::Backend(e.to_string()))?;
        let event_pump = sdl
            .event_pump()
            .map_err(|e| GlimpseError::Backend(e.to_string()))?;

        log::info!("SDL2 backend created: {width}x{height}");

        Ok(Self {
            canvas,
            event_pump,
            points: Vec::with_capacity((GLYPH_WIDTH * GLYPH_HEIGHT) as usize),
            initialized: false,
        })
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(GlimpseError::Backend(
                "canvas used before init or after shutdown".to_string(),
            ))
        }
    }
}

impl Canvas for SdlBackend {
    fn init(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas
            .window_mut()
            .set_size(width, height)
            .map_err(|e| GlimpseError::Backend(e.to_string()))?;
        self.initialized = true;
        self.clear()?;
        self.present()?;
        log::info!("SDL2 canvas initialized: {width}x{height}");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        self.canvas.set_draw_color(PAGE_COLOR);
        self.canvas.clear();
        Ok(())
    }

    fn draw_glyph(&mut self, x: i32, y: i32, ch: char) -> Result<()> {
        self.ensure_initialized()?;
        self.points.clear();
        for (row, bits) in font::glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH as i32 {
                if bits & (0x80 >> col) != 0 {
                    self.points.push(Point::new(x + col, y + row as i32));
                }
            }
        }
        if self.points.is_empty() {
            return Ok(());
        }
        self.canvas.set_draw_color(INK_COLOR);
        self.canvas
            .draw_points(self.points.as_slice())
            .map_err(GlimpseError::Backend)
    }

    fn present(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        self.canvas.present();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.initialized {
            self.initialized = false;
            self.canvas.window_mut().hide();
            log::info!("SDL2 backend shut down");
        }
        Ok(())
    }
}

impl InputBackend for SdlBackend {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.event_pump
            .poll_iter()
            .filter_map(map_sdl_event)
            .collect()
    }

    fn wait_events(&mut self) -> Vec<InputEvent> {
        let first = self.event_pump.wait_event();
        let mut events: Vec<InputEvent> = map_sdl_event(first).into_iter().collect();
        events.extend(self.poll_events());
        events
    }
}

/// Map an SDL2 event to a Glimpse input event.
fn map_sdl_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::Quit),
        Event::KeyDown {
            keycode: Some(key), ..
        } => map_key_down(key),
        Event::MouseWheel { y, direction, .. } => map_wheel(y, direction),
        _ => None,
    }
}

fn map_key_down(key: Keycode) -> Option<InputEvent> {
    match key {
        Keycode::Up => Some(InputEvent::ScrollUp),
        Keycode::Down => Some(InputEvent::ScrollDown),
        Keycode::Escape => Some(InputEvent::Quit),
        _ => None,
    }
}

/// Wheel away from the user scrolls up, unless the platform reports the
/// axis as flipped.
fn map_wheel(y: i32, direction: MouseWheelDirection) -> Option<InputEvent> {
    let delta = if matches!(direction, MouseWheelDirection::Flipped) {
        -y
    } else {
        y
    };
    InputEvent::from_wheel_delta(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_scroll() {
        assert_eq!(map_key_down(Keycode::Up), Some(InputEvent::ScrollUp));
        assert_eq!(map_key_down(Keycode::Down), Some(InputEvent::ScrollDown));
    }

    #[test]
    fn escape_quits() {
        assert_eq!(map_key_down(Keycode::Escape), Some(InputEvent::Quit));
    }

    #[test]
    fn other_keys_ignored() {
        assert_eq!(map_key_down(Keycode::A), None);
        assert_eq!(map_key_down(Keycode::Return), None);
    }

    #[test]
    fn wheel_direction() {
        assert_eq!(
            map_wheel(1, MouseWheelDirection::Normal),
            Some(InputEvent::ScrollUp)
        );
        assert_eq!(
            map_wheel(-2, MouseWheelDirection::Normal),
            Some(InputEvent::ScrollDown)
        );
        assert_eq!(
            map_wheel(1, MouseWheelDirection::Flipped),
            Some(InputEvent::ScrollDown)
        );
        assert_eq!(map_wheel(0, MouseWheelDirection::Normal), None);
    }

    #[test]
    fn window_close_quits() {
        assert_eq!(
            map_sdl_event(Event::Quit { timestamp: 0 }),
            Some(InputEvent::Quit)
        );
    }
}

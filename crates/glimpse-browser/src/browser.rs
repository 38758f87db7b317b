//! Top-level page controller.
//!
//! [`Browser`] owns the current display list and scroll state. A load
//! runs the whole pipeline to completion before anything on screen
//! changes, so a failed load leaves the previous page in place.

use glimpse_types::backend::Canvas;
use glimpse_types::config::BrowserConfig;
use glimpse_types::error::Result;
use glimpse_types::input::InputEvent;

use crate::layout::{DisplayList, layout};
use crate::lexer::strip_markup;
use crate::loader::Loader;
use crate::url::ParsedUrl;
use crate::viewport::Viewport;

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    Quit,
}

/// A single-page browser: load, lay out, scroll.
#[derive(Debug)]
pub struct Browser {
    config: BrowserConfig,
    loader: Loader,
    display_list: DisplayList,
    viewport: Viewport,
    current_url: Option<ParsedUrl>,
}

impl Browser {
    pub fn new(config: BrowserConfig, loader: Loader) -> Self {
        let viewport = Viewport::new(&config);
        Self {
            config,
            loader,
            display_list: DisplayList::default(),
            viewport,
            current_url: None,
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// URL of the page on screen, if one has loaded.
    pub fn current_url(&self) -> Option<&ParsedUrl> {
        self.current_url.as_ref()
    }

    /// Fetch `url`, strip and lay out its text, and draw it from the top.
    ///
    /// On error nothing is published and the canvas is not touched.
    pub fn load(&mut self, url: &str, canvas: &mut dyn Canvas) -> Result<()> {
        let mut parsed = ParsedUrl::parse(url)?;
        parsed.add_header("User-Agent", &self.config.user_agent);

        let body = self.loader.load_text(&parsed)?;
        let list = layout(strip_markup(body.chars()), &self.config);
        log::info!("loaded {parsed}: {} glyphs", list.len());

        self.display_list = list;
        self.viewport.reset();
        self.current_url = Some(parsed);
        self.redraw(canvas)?;
        Ok(())
    }

    /// Apply one input event, redrawing if the view moved.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        canvas: &mut dyn Canvas,
    ) -> Result<EventOutcome> {
        let moved = match event {
            InputEvent::ScrollDown => self.viewport.scroll_down(),
            InputEvent::ScrollUp => self.viewport.scroll_up(),
            InputEvent::Quit => return Ok(EventOutcome::Quit),
        };
        if moved {
            log::debug!("scroll offset {}", self.viewport.offset());
            self.redraw(canvas)?;
        }
        Ok(EventOutcome::Continue)
    }

    /// Draw the visible slice of the current page.
    pub fn redraw(&self, canvas: &mut dyn Canvas) -> Result<usize> {
        self.viewport.draw(&self.display_list, canvas)
    }
}

#[cfg(test)]
mod tests {
    use glimpse_types::error::GlimpseError;

    use super::*;
    use crate::loader::NOT_FOUND_TEXT;
    use crate::test_utils::{MockCanvas, serve_once};

    fn browser() -> Browser {
        Browser::new(BrowserConfig::default(), Loader::new())
    }

    #[test]
    fn load_data_url_draws_stripped_text() {
        let mut b = browser();
        let mut canvas = MockCanvas::new();
        b.load("data://text/html,<p>Hi &lt;there&gt;</p>", &mut canvas)
            .unwrap();

        assert_eq!(canvas.clear_count(), 1);
        assert_eq!(canvas.present_count(), 1);
        assert_eq!(canvas.last_frame_text(), "Hi <there>");
        assert_eq!(b.display_list().len(), 10);
        assert_eq!(b.current_url().unwrap().host(), "text/html");
    }

    #[test]
    fn load_missing_file_shows_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("file://{}", dir.path().join("gone.html").display());
        let mut b = browser();
        let mut canvas = MockCanvas::new();
        b.load(&url, &mut canvas).unwrap();
        assert_eq!(canvas.last_frame_text(), NOT_FOUND_TEXT);
    }

    #[test]
    fn failed_load_keeps_previous_page() {
        let mut b = browser();
        let mut canvas = MockCanvas::new();
        b.load("data://,first page", &mut canvas).unwrap();
        let before = b.display_list().clone();
        let calls = canvas.calls.len();

        let err = b.load("gopher://old.net/", &mut canvas).unwrap_err();
        assert!(matches!(err, GlimpseError::UnsupportedScheme(_)));
        let err = b.load("data://text/plain;base64,@@@", &mut canvas).unwrap_err();
        assert!(matches!(err, GlimpseError::DecodeFailure(_)));

        assert_eq!(b.display_list(), &before);
        assert_eq!(b.current_url().unwrap().path(), "/first page");
        assert_eq!(canvas.calls.len(), calls);
    }

    #[test]
    fn new_load_resets_scroll() {
        let mut b = browser();
        let mut canvas = MockCanvas::new();
        b.load("data://,one", &mut canvas).unwrap();
        b.handle_event(InputEvent::ScrollDown, &mut canvas).unwrap();
        assert_eq!(b.viewport().offset(), 100);

        b.load("data://,two", &mut canvas).unwrap();
        assert_eq!(b.viewport().offset(), 0);
        assert_eq!(canvas.last_frame_text(), "two");
    }

    #[test]
    fn scroll_redraws_only_when_moved() {
        let mut b = browser();
        let mut canvas = MockCanvas::new();
        b.load("data://,text", &mut canvas).unwrap();
        assert_eq!(canvas.present_count(), 1);

        // Already at the top.
        let out = b.handle_event(InputEvent::ScrollUp, &mut canvas).unwrap();
        assert_eq!(out, EventOutcome::Continue);
        assert_eq!(canvas.present_count(), 1);

        b.handle_event(InputEvent::ScrollDown, &mut canvas).unwrap();
        assert_eq!(canvas.present_count(), 2);

        for _ in 0..10 {
            b.handle_event(InputEvent::ScrollDown, &mut canvas).unwrap();
        }
        assert_eq!(b.viewport().offset(), b.viewport().max_offset());
        assert_eq!(canvas.present_count(), 7);
    }

    #[test]
    fn quit_event_ends_loop() {
        let mut b = browser();
        let mut canvas = MockCanvas::new();
        let out = b.handle_event(InputEvent::Quit, &mut canvas).unwrap();
        assert_eq!(out, EventOutcome::Quit);
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn draw_failure_propagates() {
        let mut b = browser();
        let mut canvas = MockCanvas {
            fail_draws: true,
            ..MockCanvas::default()
        };
        let err = b.load("data://,x", &mut canvas).unwrap_err();
        assert!(matches!(err, GlimpseError::Backend(_)));
    }

    #[test]
    fn configured_user_agent_sent() {
        let (port, server) = serve_once(b"HTTP/1.0 200 OK\r\n\r\n<h1>remote</h1>".to_vec());
        let config = BrowserConfig {
            user_agent: "glimpse-test/2".to_string(),
            ..BrowserConfig::default()
        };
        let mut b = Browser::new(config, Loader::new());
        let mut canvas = MockCanvas::new();
        b.load(&format!("http://127.0.0.1:{port}/"), &mut canvas)
            .unwrap();

        assert_eq!(canvas.last_frame_text(), "remote");
        let request = server.join().unwrap();
        assert!(request.contains("\r\nUser-Agent:glimpse-test/2\r\n"));
    }
}

//! Glimpse desktop entry point.
//!
//! Usage: `glimpse [URL]`. Without a URL the configured default page is
//! loaded. Up/Down or the mouse wheel scroll, Escape or closing the window
//! quits. Set `GLIMPSE_CONFIG` to a TOML file to override the defaults.

use std::sync::Arc;

use anyhow::{Context, Result};

use glimpse_backend_sdl::SdlBackend;
use glimpse_browser::{Browser, EventOutcome, Loader};
use glimpse_net::RustlsTlsProvider;
use glimpse_types::backend::{Canvas, InputBackend};
use glimpse_types::config::BrowserConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BrowserConfig::from_env().context("loading configuration")?;
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.default_url.clone());
    log::info!("Starting Glimpse ({}x{})", config.width, config.height);

    let mut backend = SdlBackend::new(&config.window_title, config.width, config.height)?;
    backend.init(config.width, config.height)?;

    let loader = Loader::with_tls(Arc::new(RustlsTlsProvider::new()));
    let mut browser = Browser::new(config, loader);
    if let Err(e) = browser.load(&url, &mut backend) {
        let _ = backend.shutdown();
        return Err(e).with_context(|| format!("loading {url}"));
    }

    'running: loop {
        for event in backend.wait_events() {
            match browser.handle_event(event, &mut backend) {
                Ok(EventOutcome::Quit) => break 'running,
                Ok(EventOutcome::Continue) => {},
                Err(e) => log::error!("redraw failed: {e}"),
            }
        }
    }

    backend.shutdown()?;
    Ok(())
}

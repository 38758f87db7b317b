//! Resource loading: turns a [`ParsedUrl`] into body text.
//!
//! Network schemes go through the HTTP/1.0 client in [`http`], `file`
//! reads the local filesystem, and `data` decodes the inline payload.

pub mod data;
pub mod file;
pub mod http;

use std::sync::Arc;

use glimpse_net::TlsProvider;
use glimpse_types::error::{GlimpseError, Result};

use crate::url::{ParsedUrl, Scheme};

/// Page text shown in place of a file that does not exist.
pub const NOT_FOUND_TEXT: &str = "File not found!";

/// Page text shown in place of a file that cannot be read.
pub const PERMISSION_DENIED_TEXT: &str = "Permission denied";

/// Dispatches requests by scheme.
///
/// Without a TLS provider, https requests fail with
/// [`GlimpseError::TlsHandshakeFailure`].
#[derive(Clone, Default)]
pub struct Loader {
    tls: Option<Arc<dyn TlsProvider>>,
}

impl Loader {
    /// A loader that can only fetch plain http, file and data URLs.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tls(tls: Arc<dyn TlsProvider>) -> Self {
        Self { tls: Some(tls) }
    }

    /// Fetch the body of `url` as text.
    pub fn request(&self, url: &ParsedUrl) -> Result<String> {
        log::info!("GET {url}");
        match url.scheme() {
            Scheme::Http | Scheme::Https => Ok(http::http_get(url, self.tls.as_deref())?.body),
            Scheme::File => file::read_file(url.path()),
            Scheme::Data => data::decode_payload(url.host(), &url.path()[1..]),
        }
    }

    /// Like [`Loader::request`], but a missing or unreadable file becomes
    /// placeholder page text instead of an error.
    pub fn load_text(&self, url: &ParsedUrl) -> Result<String> {
        match self.request(url) {
            Err(e) => match placeholder_text(&e) {
                Some(text) => {
                    log::warn!("{url}: {e}");
                    Ok(text.to_string())
                },
                None => Err(e),
            },
            ok => ok,
        }
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("tls", &self.tls.is_some())
            .finish()
    }
}

/// Page text substituted for a recoverable error, if any.
pub fn placeholder_text(err: &GlimpseError) -> Option<&'static str> {
    match err {
        GlimpseError::NotFound(_) => Some(NOT_FOUND_TEXT),
        GlimpseError::PermissionDenied(_) => Some(PERMISSION_DENIED_TEXT),
        _ => None,
    }
}

//! Shared test utilities for the browser crate.
//!
//! Provides a [`MockCanvas`] that records all draw calls, and one-shot
//! loopback servers (plain and TLS) that capture the request they
//! receive.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::JoinHandle;

use flate2::Compression;
use flate2::write::GzEncoder;
use rustls_pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

use glimpse_types::backend::Canvas;
use glimpse_types::error::{GlimpseError, Result};

// -----------------------------------------------------------------------
// MockCanvas
// -----------------------------------------------------------------------

/// A recorded call on the mock canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Clear,
    Glyph { x: i32, y: i32, ch: char },
    Present,
}

/// A canvas that records all draw calls for test assertions.
#[derive(Debug, Default)]
pub struct MockCanvas {
    pub calls: Vec<DrawCall>,
    /// When set, `draw_glyph` fails with a backend error.
    pub fail_draws: bool,
}

impl MockCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(x, y, ch)` of every recorded glyph, in draw order.
    pub fn glyphs(&self) -> impl Iterator<Item = (i32, i32, char)> + '_ {
        self.calls.iter().filter_map(|c| match *c {
            DrawCall::Glyph { x, y, ch } => Some((x, y, ch)),
            _ => None,
        })
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs().count()
    }

    pub fn clear_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == DrawCall::Clear).count()
    }

    pub fn present_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == DrawCall::Present).count()
    }

    /// Characters drawn since the most recent clear, as a string.
    pub fn last_frame_text(&self) -> String {
        let start = self
            .calls
            .iter()
            .rposition(|c| *c == DrawCall::Clear)
            .map_or(0, |i| i + 1);
        self.calls[start..]
            .iter()
            .filter_map(|c| match *c {
                DrawCall::Glyph { ch, .. } => Some(ch),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for MockCanvas {
    fn init(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.calls.push(DrawCall::Clear);
        Ok(())
    }

    fn draw_glyph(&mut self, x: i32, y: i32, ch: char) -> Result<()> {
        if self.fail_draws {
            return Err(GlimpseError::Backend("mock draw failure".to_string()));
        }
        self.calls.push(DrawCall::Glyph { x, y, ch });
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.calls.push(DrawCall::Present);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

// -----------------------------------------------------------------------
// Loopback servers
// -----------------------------------------------------------------------

/// Gzip `data` the way a server would for `Content-Encoding: gzip`.
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// Read until the blank line ending a request head, or until the peer
/// closes or errors.
fn read_request(stream: &mut impl Read) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 512];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&request).into_owned()
}

/// Accept one plain TCP client on a loopback port, send `response`, then
/// close. The join handle yields the request text the client sent.
pub fn serve_once(response: Vec<u8>) -> (u16, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        if !request.is_empty() {
            let _ = stream.write_all(&response);
        }
        request
    });
    (port, handle)
}

/// Self-signed certificate for `localhost` and its private key.
pub fn localhost_cert() -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let key = PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der());
    (certified.cert.der().clone(), PrivateKeyDer::Pkcs8(key))
}

/// Like [`serve_once`], over TLS with the given certificate. Yields an
/// empty string when the client aborts the handshake.
pub fn serve_tls_once(
    cert: CertificateDer<'static>,
    key: PrivateKeyDer<'static>,
    response: &'static [u8],
) -> (u16, JoinHandle<String>) {
    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert], key)
        .unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (tcp, _) = listener.accept().unwrap();
        let conn = rustls::ServerConnection::new(Arc::new(config)).unwrap();
        let mut tls = rustls::StreamOwned::new(conn, tcp);
        let request = read_request(&mut tls);
        if !request.is_empty() {
            let _ = tls.write_all(response);
            tls.conn.send_close_notify();
            let _ = tls.flush();
        }
        request
    });
    (port, handle)
}

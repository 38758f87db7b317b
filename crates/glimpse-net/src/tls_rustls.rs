//! [`TlsProvider`] backed by rustls + ring.
//!
//! Enabled by the `tls-rustls` feature.

use std::io::{self, Read, Write};
use std::sync::Arc;

use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use rustls_pki_types::ServerName;

use glimpse_types::backend::NetworkStream;
use glimpse_types::error::{GlimpseError, Result};

use super::TlsProvider;

/// Shared, reusable TLS client configuration (one per process).
pub struct RustlsTlsProvider {
    config: Arc<ClientConfig>,
}

impl RustlsTlsProvider {
    /// Build a provider that trusts Mozilla's root CA bundle.
    pub fn new() -> Self {
        let root_store = RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Self::with_root_store(root_store)
    }

    /// Build a provider that trusts exactly the anchors in `root_store`.
    pub fn with_root_store(root_store: RootCertStore) -> Self {
        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for RustlsTlsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsProvider for RustlsTlsProvider {
    fn connect_tls(
        &self,
        stream: Box<dyn NetworkStream>,
        server_name: &str,
    ) -> Result<Box<dyn NetworkStream>> {
        let sni = ServerName::try_from(server_name.to_owned()).map_err(|e| {
            GlimpseError::TlsHandshakeFailure(format!("invalid server name {server_name}: {e}"))
        })?;

        let mut conn = ClientConnection::new(Arc::clone(&self.config), sni)
            .map_err(|e| GlimpseError::TlsHandshakeFailure(format!("TLS init: {e}")))?;

        // rustls is lazy; pump I/O until the handshake (and certificate
        // verification) has finished so no request bytes leave in the clear.
        let mut io = StreamIo(stream);
        while conn.is_handshaking() {
            if let Err(e) = conn.complete_io(&mut io) {
                let _ = io.0.close();
                return Err(GlimpseError::TlsHandshakeFailure(format!(
                    "{server_name}: {e}"
                )));
            }
        }
        log::debug!(
            "TLS established with {server_name} ({:?})",
            conn.protocol_version()
        );

        Ok(Box::new(RustlsStream {
            inner: StreamOwned::new(conn, io),
        }))
    }
}

// ---------------------------------------------------------------------------
// Adapter: bridge rustls's `Read`/`Write` to our `NetworkStream` trait
// ---------------------------------------------------------------------------

/// A TLS-wrapped network stream with a completed handshake.
struct RustlsStream {
    inner: StreamOwned<ClientConnection, StreamIo>,
}

impl NetworkStream for RustlsStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => Ok(n),
            // HTTP/1.0 servers commonly drop the socket without sending
            // close_notify; the body is delimited by EOF anyway.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                log::debug!("TLS peer closed without close_notify");
                Ok(0)
            },
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(self.inner.write(data)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.inner.flush()?)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.conn.send_close_notify();
        let _ = self.inner.conn.complete_io(&mut self.inner.sock);
        self.inner.sock.0.close()
    }
}

/// Owns the plain stream and exposes it as `std::io::Read` / `Write` for
/// rustls.
struct StreamIo(Box<dyn NetworkStream>);

impl Read for StreamIo {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf).map_err(to_io_error)
    }
}

impl Write for StreamIo {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf).map_err(to_io_error)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush().map_err(to_io_error)
    }
}

/// Convert a [`GlimpseError`] to [`io::Error`], keeping the original error
/// kind when the variant is `GlimpseError::Io`.
fn to_io_error(e: GlimpseError) -> io::Error {
    match e {
        GlimpseError::Io(io_err) => io_err,
        other => io::Error::other(other.to_string()),
    }
}

//! TLS provider abstraction.
//!
//! Backends supply a [`TlsProvider`] that wraps a plain TCP
//! [`NetworkStream`] in a TLS session. The transport client uses this
//! trait so it never depends on a concrete TLS library.

use crate::backend::NetworkStream;
use crate::error::Result;

/// Provides TLS client connections.
pub trait TlsProvider: Send + Sync {
    /// Wrap `stream` in a TLS client session, completing the handshake
    /// before returning.
    ///
    /// `server_name` is used for SNI and certificate verification. A
    /// handshake or verification failure is returned as
    /// [`GlimpseError::TlsHandshakeFailure`](crate::error::GlimpseError::TlsHandshakeFailure);
    /// implementations must never hand back an unencrypted stream.
    fn connect_tls(
        &self,
        stream: Box<dyn NetworkStream>,
        server_name: &str,
    ) -> Result<Box<dyn NetworkStream>>;
}


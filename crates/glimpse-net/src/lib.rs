//! Networking: blocking std::net streams and the TLS provider.

mod std_stream;
#[cfg(feature = "tls-rustls")]
pub mod tls_rustls;

pub use glimpse_types::tls::TlsProvider;
pub use std_stream::{StdNetworkStream, tcp_connect};
#[cfg(feature = "tls-rustls")]
pub use tls_rustls::RustlsTlsProvider;

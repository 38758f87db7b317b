//! Error types for Glimpse.

use std::io;

/// Errors produced while loading and rendering a page.
#[derive(Debug, thiserror::Error)]
pub enum GlimpseError {
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unsupported transfer-encoding: {0}")]
    UnsupportedTransferEncoding(String),

    #[error("connection failed: {0}")]
    ConnectionFailure(String),

    #[error("TLS handshake failed: {0}")]
    TlsHandshakeFailure(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("decode error: {0}")]
    DecodeFailure(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GlimpseError>;

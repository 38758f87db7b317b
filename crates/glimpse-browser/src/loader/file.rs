//! `file://` loading.

use std::io::ErrorKind;

use glimpse_types::error::{GlimpseError, Result};

/// Read a local file as UTF-8 text.
///
/// Missing and unreadable files map to [`GlimpseError::NotFound`] and
/// [`GlimpseError::PermissionDenied`] so the caller can substitute page
/// text for them.
pub fn read_file(path: &str) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GlimpseError::NotFound(path.to_string()),
        ErrorKind::PermissionDenied => GlimpseError::PermissionDenied(path.to_string()),
        _ => GlimpseError::Io(e),
    })?;
    log::debug!("read {} bytes from {path}", bytes.len());
    String::from_utf8(bytes).map_err(|e| GlimpseError::DecodeFailure(format!("{path}: {e}")))
}

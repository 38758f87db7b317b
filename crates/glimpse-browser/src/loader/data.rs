//! `data://` payload decoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use glimpse_types::error::{GlimpseError, Result};

const BASE64_SUFFIX: &str = ";base64";

/// Decode an inline payload. A media type ending in `;base64` means the
/// payload is base64 text; anything else is taken verbatim.
pub fn decode_payload(media_type: &str, payload: &str) -> Result<String> {
    if !media_type.to_ascii_lowercase().ends_with(BASE64_SUFFIX) {
        return Ok(payload.to_string());
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| GlimpseError::DecodeFailure(format!("base64: {e}")))?;
    String::from_utf8(bytes).map_err(|e| GlimpseError::DecodeFailure(format!("data URL: {e}")))
}

//! Draft link codec: overlay <-> URL-safe token.
//!
//! A token is the overlay as JSON, zlib-compressed, then base64 URL-safe
//! without padding. It lets someone preview unsaved edits from a plain link,
//! with no live channel to the editor.
//!
//! ERROR HANDLING
//! ==============
//! Decoding fails closed. A token either decodes to a complete overlay or to
//! a [`DraftError`]; the zlib stream must end cleanly with no trailing bytes,
//! so a truncated token never yields a partial overlay. Rendering paths use
//! [`decode_or_empty`], which treats every failure as "no overrides".

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::{Decompress, FlushDecompress, Status};

use crate::overlay::Overlay;

/// Upper bound on the inflated payload.
pub const MAX_DECODED_BYTES: usize = 256 * 1024;

/// Error returned by [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft token is empty")]
    Empty,
    #[error("draft token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("draft token payload is corrupt: {0}")]
    Inflate(#[from] flate2::DecompressError),
    #[error("draft token payload is truncated")]
    Truncated,
    #[error("draft token has trailing bytes after the payload")]
    TrailingBytes,
    #[error("draft token payload exceeds {MAX_DECODED_BYTES} bytes")]
    TooLarge,
    #[error("draft token payload is not a valid overlay: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode an overlay into an opaque URL-safe token.
#[must_use]
pub fn encode(overlay: &Overlay) -> String {
    // Serializing an id-keyed map of JSON objects and writing into a Vec are
    // both infallible; the fallbacks only satisfy the signatures.
    let json = serde_json::to_vec(overlay).unwrap_or_default();
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
    let _ = encoder.write_all(&json);
    let compressed = encoder.finish().unwrap_or_default();
    URL_SAFE_NO_PAD.encode(compressed)
}

/// Decode a token produced by [`encode`].
///
/// # Errors
///
/// Returns a [`DraftError`] for empty, non-base64, corrupt, truncated,
/// oversized, or non-overlay payloads.
pub fn decode(token: &str) -> Result<Overlay, DraftError> {
    let token = token.trim().trim_end_matches('=');
    if token.is_empty() {
        return Err(DraftError::Empty);
    }
    let compressed = URL_SAFE_NO_PAD.decode(token)?;
    let json = inflate(&compressed)?;
    Ok(serde_json::from_slice(&json)?)
}

/// Decode an optional token, treating absence and every failure as an empty
/// overlay. The error is returned alongside for callers that want to log it.
#[must_use]
pub fn decode_or_empty(token: Option<&str>) -> (Overlay, Option<DraftError>) {
    match token.map(decode) {
        None => (Overlay::default(), None),
        Some(Ok(overlay)) => (overlay, None),
        Some(Err(err)) => (Overlay::default(), Some(err)),
    }
}

/// Build a share link for `base` (e.g. `https://host/app/preview/home`).
#[must_use]
pub fn share_link(base: &str, overlay: &Overlay) -> String {
    if overlay.is_empty() {
        return base.to_owned();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}draft={}", encode(overlay))
}

fn inflate(compressed: &[u8]) -> Result<Vec<u8>, DraftError> {
    let mut inflater = Decompress::new(true);
    let mut out: Vec<u8> = Vec::with_capacity(compressed.len().saturating_mul(4).clamp(64, MAX_DECODED_BYTES + 1));

    loop {
        if out.len() == out.capacity() {
            // One byte past the cap is enough to tell "too large" apart.
            let room = out.capacity().max(64).min(MAX_DECODED_BYTES + 1 - out.len());
            out.reserve_exact(room);
        }

        let consumed = usize::try_from(inflater.total_in()).unwrap_or(usize::MAX);
        let input = compressed.get(consumed..).unwrap_or_default();
        let before_in = inflater.total_in();
        let before_out = inflater.total_out();

        let status = inflater.decompress_vec(input, &mut out, FlushDecompress::None)?;
        if out.len() > MAX_DECODED_BYTES {
            return Err(DraftError::TooLarge);
        }
        if status == Status::StreamEnd {
            break;
        }

        let progressed = inflater.total_in() != before_in || inflater.total_out() != before_out;
        if !progressed && out.len() < out.capacity() {
            return Err(DraftError::Truncated);
        }
    }

    let consumed = usize::try_from(inflater.total_in()).unwrap_or(usize::MAX);
    if consumed != compressed.len() {
        return Err(DraftError::TrailingBytes);
    }
    Ok(out)
}

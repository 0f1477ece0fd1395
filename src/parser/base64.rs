//! Base64 boundary codec
//!
//! Share links come from many producers, each with its own idea of Base64:
//! standard or URL-safe alphabet, with or without padding, sometimes wrapped
//! across lines. Decoding accepts all of them; encoding is explicit about the
//! variant each grammar expects.

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use tracing::trace;

// ============================================================================
// Decoding
// ============================================================================

/// Decodes Base64 content, trying multiple variants
///
/// Attempts to decode the content using:
/// 1. Standard Base64
/// 2. URL-safe Base64
/// 3. URL-safe Base64 without padding
/// 4. Standard/URL-safe with padding added
///
/// Whitespace in the input is removed before decoding.
pub fn decode_base64(content: &str) -> Result<Vec<u8>> {
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    trace!(
        "Attempting Base64 decode, cleaned length: {} bytes",
        cleaned.len()
    );

    if let Ok(decoded) = STANDARD.decode(&cleaned) {
        trace!("Decoded using standard Base64");
        return Ok(decoded);
    }

    if let Ok(decoded) = URL_SAFE.decode(&cleaned) {
        trace!("Decoded using URL-safe Base64");
        return Ok(decoded);
    }

    if let Ok(decoded) = URL_SAFE_NO_PAD.decode(&cleaned) {
        trace!("Decoded using URL-safe Base64 without padding");
        return Ok(decoded);
    }

    let padded = add_base64_padding(&cleaned);
    if let Ok(decoded) = STANDARD.decode(&padded) {
        trace!("Decoded using standard Base64 with added padding");
        return Ok(decoded);
    }
    if let Ok(decoded) = URL_SAFE.decode(&padded) {
        trace!("Decoded using URL-safe Base64 with added padding");
        return Ok(decoded);
    }

    bail!("Failed to decode Base64 content")
}

/// Decodes Base64 content that must hold UTF-8 text
pub fn decode_base64_str(content: &str) -> Result<String> {
    let bytes = decode_base64(content)?;
    String::from_utf8(bytes).context("Decoded Base64 content is not valid UTF-8")
}

/// Adds `=` padding so the length is a multiple of 4
pub fn add_base64_padding(s: &str) -> String {
    let mut result = s.to_string();
    while !result.len().is_multiple_of(4) {
        result.push('=');
    }
    result
}

/// Checks whether every character belongs to a Base64 alphabet
///
/// Accepts both the standard and URL-safe alphabets plus padding. An empty
/// string is not considered Base64.
pub fn is_base64_text(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=' || c == '-' || c == '_'
        })
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes with the standard alphabet and padding (SS userinfo, VMess JSON)
pub fn encode_base64(content: &str) -> String {
    STANDARD.encode(content)
}

/// Encodes with the URL-safe alphabet and no padding (SSR)
pub fn encode_base64_url(content: &str) -> String {
    URL_SAFE_NO_PAD.encode(content)
}

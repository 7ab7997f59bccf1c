//! Base64 decoding utilities
//!
//! Two flavours are needed: a strict detector used when scanning bulk text
//! (so ordinary words are never mistaken for Base64), and a lenient decoder
//! for payloads that are known to be Base64 such as VMess links.

use anyhow::{Result, bail};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use tracing::trace;

// ============================================================================
// Strict Detection
// ============================================================================

/// Checks whether `s` is canonical standard Base64
///
/// The string must use only the standard alphabet plus `=`, have a length
/// that is a positive multiple of 4, decode cleanly, and re-encode to the
/// exact same text.
pub fn is_strict_base64(s: &str) -> bool {
    decode_strict(s).is_some()
}

/// Decodes `s` only if it passes [`is_strict_base64`]
pub fn decode_strict(s: &str) -> Option<Vec<u8>> {
    if s.len() < 4 || !s.len().is_multiple_of(4) {
        return None;
    }

    if !s
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
    {
        return None;
    }

    let decoded = STANDARD.decode(s).ok()?;
    if STANDARD.encode(&decoded) != s {
        return None;
    }
    Some(decoded)
}

// ============================================================================
// Lenient Decoding
// ============================================================================

/// Decodes Base64 content, trying multiple variants
///
/// Attempts to decode the content using:
/// 1. Standard Base64
/// 2. URL-safe Base64
/// 3. URL-safe Base64 without padding
/// 4. Standard/URL-safe with padding added
///
/// Whitespace in the input is automatically removed before decoding.
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

/// Adds proper padding to Base64 string if missing
pub fn add_base64_padding(s: &str) -> String {
    let mut result = s.to_string();
    while !result.len().is_multiple_of(4) {
        result.push('=');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_accepts_canonical() {
        assert!(is_strict_base64("aGVsbG8gd29ybGQ="));
        assert_eq!(
            decode_strict("aGVsbG8gd29ybGQ=").unwrap(),
            b"hello world".to_vec()
        );
    }

    #[test]
    fn test_strict_rejects_bad_length() {
        assert!(!is_strict_base64("aGVsbG8gd29ybGQ"));
        assert!(!is_strict_base64("abc"));
        assert!(!is_strict_base64(""));
    }

    #[test]
    fn test_strict_rejects_url_safe_alphabet() {
        assert!(!is_strict_base64("aGVsbG8td29ybGQ_"));
    }

    #[test]
    fn test_strict_rejects_whitespace() {
        assert!(!is_strict_base64("aGVs bG8g"));
    }

    #[test]
    fn test_strict_rejects_non_canonical_padding_bits() {
        // "aGVsbG9=" decodes but re-encodes differently
        assert!(!is_strict_base64("aGVsbG9="));
    }

    #[test]
    fn test_strict_rejects_plain_link() {
        assert!(!is_strict_base64("vless://uuid@example.com:443"));
    }

    #[test]
    fn test_decode_base64_standard() {
        let decoded = decode_base64("aGVsbG8gd29ybGQ=").unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_base64_with_linebreaks() {
        let decoded = decode_base64("aGVs\nbG8g\nd29y\nbGQ=").unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_base64_without_padding() {
        let decoded = decode_base64("aGVsbG8gd29ybGQ").unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_base64_url_safe() {
        assert!(decode_base64("aGVsbG8td29ybGQ_").is_ok());
    }

    #[test]
    fn test_decode_base64_invalid() {
        assert!(decode_base64("not valid base64!!!").is_err());
    }

    #[test]
    fn test_add_base64_padding() {
        assert_eq!(add_base64_padding("abcd"), "abcd");
        assert_eq!(add_base64_padding("abc"), "abc=");
        assert_eq!(add_base64_padding("ab"), "ab==");
        assert_eq!(add_base64_padding(""), "");
    }
}

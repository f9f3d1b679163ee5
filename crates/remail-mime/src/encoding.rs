//! Decoding of MIME transfer encodings and RFC 2047 encoded words.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045).
///
/// Operates on bytes, so raw multi-byte UTF-8 in the input passes
/// through unchanged instead of being truncated to a single byte.
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences.
pub fn decode_quoted_printable(text: &str) -> Result<String> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        // Soft line break
        if bytes.get(i + 1) == Some(&b'\r') && bytes.get(i + 2) == Some(&b'\n') {
            i += 3;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'\n') {
            i += 2;
            continue;
        }

        let hex = bytes.get(i + 1..i + 3).ok_or_else(|| {
            Error::InvalidEncoding("incomplete escape sequence".to_string())
        })?;
        let hex = std::str::from_utf8(hex)
            .map_err(|_| Error::InvalidEncoding("non-ASCII escape sequence".to_string()))?;
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|e| Error::InvalidEncoding(format!("invalid hex: {e}")))?;
        result.push(byte);
        i += 3;
    }

    String::from_utf8(result).map_err(Into::into)
}

/// Decodes a single RFC 2047 encoded word (`=?charset?B|Q?text?=`).
fn decode_encoded_word(word: &str) -> Result<String> {
    let inner = word
        .strip_prefix("=?")
        .and_then(|w| w.strip_suffix("?="))
        .ok_or_else(|| Error::InvalidEncoding("not an encoded word".to_string()))?;

    let parts: Vec<&str> = inner.splitn(3, '?').collect();
    if parts.len() != 3 {
        return Err(Error::InvalidEncoding(
            "malformed encoded word".to_string(),
        ));
    }

    let encoding = parts[1].to_uppercase();
    let payload = parts[2];

    match encoding.as_str() {
        "B" => {
            let decoded = decode_base64(payload)?;
            String::from_utf8(decoded).map_err(Into::into)
        }
        "Q" => {
            // Q encoding uses underscore for space.
            decode_quoted_printable(&payload.replace('_', " "))
        }
        _ => Err(Error::InvalidEncoding(format!(
            "unknown encoding: {encoding}"
        ))),
    }
}

/// Decodes a header value that may embed RFC 2047 encoded words.
///
/// Encoded words can appear anywhere in the value, as in
/// `=?utf-8?B?...?= <news@example.com>`. Tokens that fail to decode are
/// kept verbatim; a display name that cannot be decoded is still more
/// useful than an error for the whole header.
#[must_use]
pub fn decode_header_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    let mut previous_was_encoded = false;

    while let Some(start) = rest.find("=?") {
        let Some(end_rel) = rest[start + 2..].find("?=") else {
            break;
        };
        let end = start + 2 + end_rel + 2;
        let word = &rest[start..end];

        match decode_encoded_word(word) {
            Ok(decoded) => {
                let gap = &rest[..start];
                // Whitespace between adjacent encoded words is not
                // significant (RFC 2047 section 6.2).
                if !(previous_was_encoded && gap.trim().is_empty()) {
                    out.push_str(gap);
                }
                out.push_str(&decoded);
                previous_was_encoded = true;
            }
            Err(_) => {
                out.push_str(&rest[..end]);
                previous_was_encoded = false;
            }
        }
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

//! Header block parsing.

use std::collections::HashMap;

use crate::encoding::decode_header_value;
use crate::error::{Error, Result};

/// The parsed header block of one message.
///
/// Names are matched case-insensitively. Values are stored as received;
/// [`HeaderBlock::get_decoded`] applies RFC 2047 decoding on lookup.
#[derive(Debug, Clone, Default)]
pub struct HeaderBlock {
    headers: HashMap<String, Vec<String>>,
}

impl HeaderBlock {
    /// Creates an empty header block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .entry(name.into().to_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Returns the first raw value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|v| v.first().map(String::as_str))
    }

    /// Returns the first value with RFC 2047 encoded words decoded.
    #[must_use]
    pub fn get_decoded(&self, name: &str) -> Option<String> {
        self.get(name).map(decode_header_value)
    }

    /// True when no headers were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Parses a raw header block as retrieved from a header-fields fetch.
    ///
    /// Folded continuation lines (leading space or tab) are unfolded into
    /// the preceding header's value.
    ///
    /// # Errors
    ///
    /// Returns an error when the block is not valid UTF-8.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| Error::InvalidHeader(format!("not UTF-8: {e}")))?;

        let mut block = Self::new();
        let mut current: Option<(String, String)> = None;

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = current.as_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                block.add(name, value.trim().to_string());
            }
            if let Some((name, value)) = line.split_once(':') {
                current = Some((name.trim().to_string(), value.trim().to_string()));
            }
        }

        if let Some((name, value)) = current {
            block.add(name, value.trim().to_string());
        }

        Ok(block)
    }
}

//! Error types for header parsing.

use std::string::FromUtf8Error;

/// Result type alias for header operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Header parsing and decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Header block is not valid UTF-8 or is structurally broken.
    #[error("invalid header block: {0}")]
    InvalidHeader(String),

    /// Encoded word or transfer encoding could not be decoded.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 decode error.
    #[error("base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// UTF-8 decode error.
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(#[from] FromUtf8Error),
}

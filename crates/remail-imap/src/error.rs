//! Error types for the IMAP client.

/// Result type alias for IMAP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// IMAP client errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on the underlying transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake or session error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Hostname is not a valid DNS name for TLS.
    #[error("invalid DNS name: {0}")]
    InvalidDnsName(String),

    /// Server response could not be parsed.
    #[error("parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset into the response where parsing failed.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// Server rejected the credentials.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Server answered a command with NO.
    #[error("server said NO: {0}")]
    No(String),

    /// Server answered a command with BAD.
    #[error("server said BAD: {0}")]
    Bad(String),

    /// Server sent BYE and is closing the connection.
    #[error("server closed connection: {0}")]
    Bye(String),

    /// Server violated the protocol.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

impl From<rustls::pki_types::InvalidDnsNameError> for Error {
    fn from(err: rustls::pki_types::InvalidDnsNameError) -> Self {
        Self::InvalidDnsName(err.to_string())
    }
}

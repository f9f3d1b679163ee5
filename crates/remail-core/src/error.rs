//! Error types for core operations.
//!
//! Session-level failures are classified by the phase they occurred in,
//! so callers can distinguish "could not reach the server" from "wrong
//! password" from "INBOX would not open". Per-message parse failures are
//! not represented here at all; they are logged and the message dropped.

use thiserror::Error;

/// Errors surfaced by core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure to reach or talk to the server.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Server rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Connect or authentication deadline exceeded.
    #[error("timed out: {0}")]
    Timeout(String),

    /// INBOX could not be opened read-write.
    #[error("could not open mailbox: {0}")]
    MailboxOpen(String),

    /// Search or retrieval batch failed.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The flag phase of a deletion failed; nothing was expunged.
    #[error("could not flag messages for deletion: {0}")]
    Flag(String),

    /// The expunge phase failed after flagging succeeded. Delete state
    /// is unknown; messages may be flagged but not removed.
    #[error("expunge failed, delete state unknown: {0}")]
    Expunge(String),

    /// Deletion was requested with identifiers from a different mailbox
    /// generation.
    #[error("stale identifiers: {0}")]
    StaleIdentifiers(String),

    /// Sender list or config file I/O failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

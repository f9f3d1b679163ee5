//! JSON response shapes printed by the CLI.
//!
//! Every command answers with one JSON object carrying a `success` flag,
//! so the output can be consumed by a web layer or scripts unchanged.
//! Failures use the same shape with `success: false` and a message.

use serde::Serialize;

use remail_core::{MailboxStats, MessageId, MessageRecord};

/// The watched-sender list.
#[derive(Debug, Serialize)]
pub struct Senders {
    /// Always true; failures use [`Outcome`].
    pub success: bool,
    /// Addresses in stored order.
    pub senders: Vec<String>,
}

impl Senders {
    pub fn new(senders: Vec<String>) -> Self {
        Self {
            success: true,
            senders,
        }
    }
}

/// Result of an add or remove on the sender list.
#[derive(Debug, Serialize)]
pub struct SenderChange {
    /// Always true; failures use [`Outcome`].
    pub success: bool,
    /// False when the operation was a no-op (duplicate add, absent
    /// remove).
    pub changed: bool,
    /// The list after the operation.
    pub senders: Vec<String>,
}

impl SenderChange {
    pub fn new(changed: bool, senders: Vec<String>) -> Self {
        Self {
            success: true,
            changed,
            senders,
        }
    }
}

/// Messages matching the sender/age filter.
#[derive(Debug, Serialize)]
pub struct Emails {
    /// Always true; failures use [`Outcome`].
    pub success: bool,
    /// Number of matching messages.
    pub count: usize,
    /// The matching messages.
    pub emails: Vec<MessageRecord>,
}

impl Emails {
    pub fn new(emails: Vec<MessageRecord>) -> Self {
        Self {
            success: true,
            count: emails.len(),
            emails,
        }
    }
}

/// Identifiers accepted for deletion.
#[derive(Debug, Serialize)]
pub struct Deleted {
    /// Always true; failures use [`Outcome`].
    pub success: bool,
    /// Number of deleted messages.
    pub count: usize,
    /// The deleted identifiers, echoed back.
    pub deleted: Vec<MessageId>,
}

impl Deleted {
    pub fn new(deleted: Vec<MessageId>) -> Self {
        Self {
            success: true,
            count: deleted.len(),
            deleted,
        }
    }
}

/// Per-sender statistics.
#[derive(Debug, Serialize)]
pub struct Stats {
    /// Always true; failures use [`Outcome`].
    pub success: bool,
    /// The aggregated counts.
    pub stats: MailboxStats,
}

impl Stats {
    pub const fn new(stats: MailboxStats) -> Self {
        Self {
            success: true,
            stats,
        }
    }
}

/// Plain success/failure with a message.
#[derive(Debug, Serialize)]
pub struct Outcome {
    /// Whether the command succeeded.
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Prints one response object to stdout.
///
/// # Errors
///
/// Propagates serialization failure.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

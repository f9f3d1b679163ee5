//! The sender/age predicate.

use chrono::{DateTime, Utc};

use crate::record::MessageRecord;

/// True when the record's sender is in the watched list and the message
/// is older than the cutoff. Pure; no I/O, no mutation.
#[must_use]
pub fn matches(record: &MessageRecord, senders: &[String], cutoff: DateTime<Utc>) -> bool {
    senders.iter().any(|s| s == &record.sender_email) && record.date < cutoff
}

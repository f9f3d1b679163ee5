//! Per-sender statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter;
use crate::record::MessageRecord;

/// Fixed lookback window for statistics, independent of whatever window
/// a caller uses for browsing.
pub const STATS_WINDOW_DAYS: i64 = 365;

/// Counts derived from one full fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxStats {
    /// Number of watched senders, matching or not.
    pub total_senders: usize,
    /// Number of messages matching the filter within the window.
    pub total_emails: usize,
    /// Message count per sender, only senders with at least one match.
    pub emails_by_sender: BTreeMap<String, usize>,
}

/// Tallies matching records per sender.
#[must_use]
pub fn aggregate(
    records: &[MessageRecord],
    senders: &[String],
    cutoff: DateTime<Utc>,
) -> MailboxStats {
    let mut emails_by_sender: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_emails = 0;

    for record in records {
        if filter::matches(record, senders, cutoff) {
            total_emails += 1;
            *emails_by_sender.entry(record.sender_email.clone()).or_default() += 1;
        }
    }

    MailboxStats {
        total_senders: senders.len(),
        total_emails,
        emails_by_sender,
    }
}

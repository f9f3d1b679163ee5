//! Message records produced by the fetch pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one message within a mailbox generation.
///
/// `generation` is the UIDVALIDITY reported when the mailbox was opened.
/// Deletion rejects identifiers whose generation no longer matches the
/// open mailbox; a generation of 0 means the server reported none and
/// the check is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId {
    /// Message UID.
    pub uid: u32,
    /// UIDVALIDITY the UID was obtained under.
    pub generation: u32,
}

/// One parsed message header, immutable after creation.
///
/// Lives for the duration of one fetch operation's result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Identifier usable for a later deletion in the same generation.
    pub id: MessageId,
    /// Decoded `From` header as displayed.
    pub from: String,
    /// Address extracted from `From`, compared against the sender list.
    pub sender_email: String,
    /// Decoded `Subject`, empty when absent.
    pub subject: String,
    /// Message date; fetch time when the `Date` header was unusable.
    pub date: DateTime<Utc>,
    /// Whole days between fetch time and `date`, floored.
    pub days_old: i64,
}

/// Floored whole days from `then` to `now`.
///
/// Future-dated messages yield negative ages, matching floor semantics.
#[must_use]
pub fn days_between(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_seconds().div_euclid(86_400)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_same_instant_is_zero() {
        let now = at("2024-06-01 12:00:00");
        assert_eq!(days_between(now, now), 0);
    }

    #[test]
    fn test_partial_day_floors_to_zero() {
        let now = at("2024-06-01 12:00:00");
        let then = at("2024-05-31 13:00:00");
        assert_eq!(days_between(now, then), 0);
    }

    #[test]
    fn test_whole_days() {
        let now = at("2024-06-01 12:00:00");
        let then = at("2024-04-22 12:00:00");
        assert_eq!(days_between(now, then), 40);
    }

    #[test]
    fn test_future_date_floors_negative() {
        let now = at("2024-06-01 12:00:00");
        let then = at("2024-06-01 13:00:00");
        assert_eq!(days_between(now, then), -1);
    }
}

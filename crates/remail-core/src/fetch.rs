//! Header-only message retrieval and parsing.
//!
//! Enumerates every message with `UID SEARCH ALL`, fetches only the
//! `FROM`, `SUBJECT` and `DATE` header fields in one batch, then parses
//! each blob as its own task. A message that fails to parse is logged
//! and dropped; it never fails the batch. Filtering happens entirely on
//! the client because the server's search vocabulary cannot express
//! membership in an arbitrary sender list.

use chrono::{DateTime, Utc};
use remail_imap::{FetchEntry, UidSet};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinSet;

use crate::record::{MessageId, MessageRecord, days_between};
use crate::session::Session;
use crate::{Error, Result};

const HEADER_FIELDS: &[&str] = &["FROM", "SUBJECT", "DATE"];

/// Retrieves and parses every message header in the open mailbox.
///
/// Output order follows parse completion, not server enumeration order.
///
/// # Errors
///
/// Returns [`Error::Fetch`] when enumeration or the retrieval batch
/// fails. Per-message parse failures do not error.
pub async fn fetch_all<S>(session: &mut Session<S>) -> Result<Vec<MessageRecord>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let generation = session.generation().map_or(0, remail_imap::UidValidity::get);
    let client = session.client_mut()?;

    let uids = client
        .uid_search_all()
        .await
        .map_err(|e| Error::Fetch(format!("search failed: {e}")))?;
    if uids.is_empty() {
        tracing::debug!("mailbox enumeration returned no messages");
        return Ok(Vec::new());
    }

    let expected = uids.len();
    let set = UidSet::new(uids)
        .ok_or_else(|| Error::Fetch("enumeration produced an empty set".to_string()))?;
    let entries = client
        .uid_fetch_headers(&set, HEADER_FIELDS)
        .await
        .map_err(|e| Error::Fetch(format!("header fetch failed: {e}")))?;

    let fetched_at = Utc::now();
    let mut tasks = JoinSet::new();
    for entry in entries {
        tasks.spawn(async move { parse_entry(&entry, generation, fetched_at) });
    }

    // Join every parse task and count completions against the number of
    // enumerated messages, rather than trusting an end-of-stream signal.
    let mut records = Vec::new();
    let mut completed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        completed += 1;
        match joined {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "header parse task failed"),
        }
    }

    if completed < expected {
        tracing::debug!(
            expected,
            completed,
            "server returned fewer messages than enumerated"
        );
    }
    tracing::info!(parsed = records.len(), expected, "fetch complete");
    Ok(records)
}

/// Parses one fetch entry into a record. `None` means the entry was
/// unusable; the reason has been logged.
fn parse_entry(
    entry: &FetchEntry,
    generation: u32,
    fetched_at: DateTime<Utc>,
) -> Option<MessageRecord> {
    let Some(uid) = entry.uid else {
        tracing::warn!("dropping fetch entry without UID");
        return None;
    };
    let Some(raw) = entry.header.as_deref() else {
        tracing::warn!(uid = uid.get(), "dropping fetch entry without header data");
        return None;
    };

    let block = match remail_mime::HeaderBlock::parse(raw) {
        Ok(block) => block,
        Err(e) => {
            tracing::warn!(uid = uid.get(), error = %e, "dropping unparseable header");
            return None;
        }
    };

    let from = block.get_decoded("From").unwrap_or_default();
    let sender_email = remail_mime::extract_address(&from);
    let subject = block.get_decoded("Subject").unwrap_or_default();

    // A missing or malformed Date reads as "now", which makes the
    // message zero days old.
    let date = block
        .get("Date")
        .and_then(remail_mime::parse_date)
        .unwrap_or(fetched_at);

    Some(MessageRecord {
        id: MessageId {
            uid: uid.get(),
            generation,
        },
        from,
        sender_email,
        subject,
        date,
        days_old: days_between(fetched_at, date),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use remail_imap::Uid;

    fn entry(uid: u32, header: &[u8]) -> FetchEntry {
        FetchEntry {
            uid: Uid::new(uid),
            header: Some(header.to_vec()),
        }
    }

    #[test]
    fn test_parse_entry_complete_header() {
        let now = Utc::now();
        let raw = b"From: Alice <alice@example.com>\r\nSubject: hello\r\nDate: Mon, 15 Jan 2024 12:00:00 +0000\r\n\r\n";
        let record = parse_entry(&entry(7, raw), 42, now).unwrap();

        assert_eq!(record.id, MessageId { uid: 7, generation: 42 });
        assert_eq!(record.sender_email, "alice@example.com");
        assert_eq!(record.subject, "hello");
        assert!(record.days_old >= 0);
    }

    #[test]
    fn test_parse_entry_missing_date_is_zero_days_old() {
        let now = Utc::now();
        let raw = b"From: bob@example.com\r\nSubject: no date here\r\n\r\n";
        let record = parse_entry(&entry(1, raw), 0, now).unwrap();

        assert_eq!(record.date, now);
        assert_eq!(record.days_old, 0);
    }

    #[test]
    fn test_parse_entry_malformed_date_is_zero_days_old() {
        let now = Utc::now();
        let raw = b"From: bob@example.com\r\nDate: yesterday-ish\r\n\r\n";
        let record = parse_entry(&entry(1, raw), 0, now).unwrap();
        assert_eq!(record.days_old, 0);
    }

    #[test]
    fn test_parse_entry_decodes_encoded_from() {
        let now = Utc::now();
        let raw =
            b"From: =?utf-8?B?TmV3c2xldHRlcg==?= <news@example.com>\r\nSubject: x\r\n\r\n";
        let record = parse_entry(&entry(2, raw), 0, now).unwrap();

        assert_eq!(record.from, "Newsletter <news@example.com>");
        assert_eq!(record.sender_email, "news@example.com");
    }

    #[test]
    fn test_parse_entry_without_uid_dropped() {
        let e = FetchEntry {
            uid: None,
            header: Some(b"From: a@b.c\r\n\r\n".to_vec()),
        };
        assert!(parse_entry(&e, 0, Utc::now()).is_none());
    }

    #[test]
    fn test_parse_entry_without_header_dropped() {
        let e = FetchEntry {
            uid: Uid::new(3),
            header: None,
        };
        assert!(parse_entry(&e, 0, Utc::now()).is_none());
    }

    #[test]
    fn test_parse_entry_invalid_utf8_dropped() {
        let e = entry(4, &[0xFF, 0xFE, 0xFD]);
        assert!(parse_entry(&e, 0, Utc::now()).is_none());
    }
}

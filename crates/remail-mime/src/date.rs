//! Date header parsing.

use chrono::{DateTime, Utc};

/// Parses a `Date` header value into a UTC timestamp.
///
/// Returns `None` for missing-in-spirit values: empty strings, malformed
/// dates, anything RFC 2822 parsing rejects. A trailing comment such as
/// `(UTC)` is stripped first since chrono does not accept it.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = strip_trailing_comment(trimmed);
    DateTime::parse_from_rfc2822(candidate)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Strips one trailing parenthesized comment, e.g. `... +0000 (UTC)`.
fn strip_trailing_comment(value: &str) -> &str {
    if value.ends_with(')') {
        if let Some(open) = value.rfind('(') {
            return value[..open].trim_end();
        }
    }
    value
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc2822() {
        let dt = parse_date("Tue, 1 Jul 2003 10:52:37 +0200").unwrap();
        assert_eq!(dt.year(), 2003);
        assert_eq!(dt.hour(), 8); // normalized to UTC
    }

    #[test]
    fn test_parse_with_trailing_comment() {
        let dt = parse_date("Mon, 15 Jan 2024 12:00:00 +0000 (UTC)").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.day(), 15);
    }

    #[test]
    fn test_malformed_is_none() {
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("   ").is_none());
        assert!(parse_date("32 Foo 2024").is_none());
    }
}

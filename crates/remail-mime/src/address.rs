//! Best-effort sender address extraction.

/// Extracts the address portion of a `From` header value.
///
/// Takes the bracketed `<addr>` when present, otherwise returns the raw
/// value trimmed. This intentionally stops short of RFC 5322 mailbox
/// parsing; the result is only compared against a user-maintained list.
#[must_use]
pub fn extract_address(from: &str) -> String {
    if let Some(open) = from.find('<') {
        if let Some(close_rel) = from[open + 1..].find('>') {
            return from[open + 1..open + 1 + close_rel].trim().to_string();
        }
    }
    from.trim().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_address() {
        assert_eq!(
            extract_address("Alice Example <alice@example.com>"),
            "alice@example.com"
        );
    }

    #[test]
    fn test_bare_address() {
        assert_eq!(extract_address("bob@example.com"), "bob@example.com");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(extract_address("  carol@example.com "), "carol@example.com");
        assert_eq!(extract_address("X < d@e.f >"), "d@e.f");
    }

    #[test]
    fn test_unclosed_bracket_falls_back() {
        assert_eq!(
            extract_address("Broken <who@example.com"),
            "Broken <who@example.com"
        );
    }

    #[test]
    fn test_quoted_display_name_with_brackets() {
        assert_eq!(
            extract_address("\"News <daily>\" <news@example.com>"),
            "daily"
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_bracketed_address_always_extracted(
            name in "[A-Za-z ]{0,12}",
            local in "[a-z0-9.]{1,10}",
            domain in "[a-z0-9.]{1,10}",
        ) {
            let addr = format!("{local}@{domain}");
            let header = format!("{name} <{addr}>");
            proptest::prop_assert_eq!(extract_address(&header), addr);
        }
    }
}

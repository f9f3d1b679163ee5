//! Server response parsing.
//!
//! Parses exactly the response shapes the client consumes. Untagged data
//! it does not understand is preserved as [`ServerData::Other`] so callers
//! can skip it without failing the exchange.

use crate::types::{SeqNum, Status, Uid, UidValidity};
use crate::{Error, Result};

/// One parsed response unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Command completion, matched to a command by tag.
    Tagged {
        /// Echoed command tag.
        tag: String,
        /// Completion status.
        status: Status,
        /// Optional bracketed response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// Untagged server data.
    Untagged(ServerData),
    /// Command continuation request (`+ ...`).
    Continuation(String),
}

/// Untagged data the server may send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerData {
    /// `* OK/NO/BAD [code] text` condition state.
    Condition {
        /// Condition status.
        status: Status,
        /// Optional bracketed response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* BYE text`; the server is closing the connection.
    Bye(String),
    /// `* n EXISTS`
    Exists(u32),
    /// `* n RECENT`
    Recent(u32),
    /// `* n EXPUNGE`
    Expunge(SeqNum),
    /// `* SEARCH n...`, UIDs because the client only issues UID SEARCH.
    Search(Vec<Uid>),
    /// `* n FETCH (...)`
    Fetch {
        /// Message sequence number.
        seq: SeqNum,
        /// Parsed data items.
        entry: FetchEntry,
    },
    /// Anything else, kept verbatim for the caller to skip.
    Other(String),
}

/// Bracketed response code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// `[UIDVALIDITY n]`
    UidValidity(UidValidity),
    /// `[READ-WRITE]`
    ReadWrite,
    /// `[READ-ONLY]`
    ReadOnly,
    /// Any other code, verbatim.
    Other(String),
}

/// Data items extracted from one FETCH response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchEntry {
    /// `UID` item, when requested.
    pub uid: Option<Uid>,
    /// Literal body of a `BODY[HEADER.FIELDS (...)]` item.
    pub header: Option<Vec<u8>>,
}

impl Response {
    /// Parses one complete response unit as returned by the wire layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the unit does not match any known
    /// response shape.
    pub fn parse(unit: &[u8]) -> Result<Self> {
        if unit.starts_with(b"+ ") || unit == b"+\r\n" {
            let text = text_after(unit, 1);
            return Ok(Self::Continuation(text));
        }

        if let Some(rest) = unit.strip_prefix(b"* ") {
            return parse_untagged(rest, unit.len() - rest.len());
        }

        parse_tagged(unit)
    }
}

fn parse_untagged(rest: &[u8], base: usize) -> Result<Response> {
    let (word, after) = next_word(rest);

    if let Ok(n) = ascii_number(word) {
        let (kind, tail) = next_word(after);
        return match kind {
            b"EXISTS" => Ok(Response::Untagged(ServerData::Exists(n))),
            b"RECENT" => Ok(Response::Untagged(ServerData::Recent(n))),
            b"EXPUNGE" => SeqNum::new(n)
                .map(|seq| Response::Untagged(ServerData::Expunge(seq)))
                .ok_or_else(|| parse_error(base, "EXPUNGE with sequence number 0")),
            b"FETCH" => {
                let seq = SeqNum::new(n)
                    .ok_or_else(|| parse_error(base, "FETCH with sequence number 0"))?;
                let entry = parse_fetch_entry(tail, base)?;
                Ok(Response::Untagged(ServerData::Fetch { seq, entry }))
            }
            _ => Ok(Response::Untagged(ServerData::Other(lossy_line(rest)))),
        };
    }

    match word {
        b"SEARCH" => {
            let mut uids = Vec::new();
            for token in after
                .strip_suffix(b"\r\n")
                .unwrap_or(after)
                .split(|&b| b == b' ')
                .filter(|t| !t.is_empty())
            {
                let n = ascii_number(token)
                    .map_err(|()| parse_error(base, "non-numeric SEARCH result"))?;
                let uid =
                    Uid::new(n).ok_or_else(|| parse_error(base, "SEARCH result of 0"))?;
                uids.push(uid);
            }
            Ok(Response::Untagged(ServerData::Search(uids)))
        }
        b"OK" | b"NO" | b"BAD" => {
            let status = status_of(word);
            let (code, text) = parse_code_and_text(after);
            Ok(Response::Untagged(ServerData::Condition {
                status,
                code,
                text,
            }))
        }
        b"BYE" => Ok(Response::Untagged(ServerData::Bye(text_after(after, 0)))),
        _ => Ok(Response::Untagged(ServerData::Other(lossy_line(rest)))),
    }
}

fn parse_tagged(unit: &[u8]) -> Result<Response> {
    let (tag, rest) = next_word(unit);
    if tag.is_empty() || rest.is_empty() {
        return Err(parse_error(0, "empty response"));
    }

    let (word, after) = next_word(rest);
    let status = match word {
        b"OK" | b"NO" | b"BAD" => status_of(word),
        _ => {
            return Err(parse_error(
                tag.len() + 1,
                "expected OK, NO or BAD after tag",
            ));
        }
    };

    let (code, text) = parse_code_and_text(after);
    Ok(Response::Tagged {
        tag: String::from_utf8_lossy(tag).into_owned(),
        status,
        code,
        text,
    })
}

/// Extracts the UID item and the header literal from a FETCH body.
///
/// Item order is server-defined, so the UID is searched for outside the
/// literal rather than positionally.
fn parse_fetch_entry(body: &[u8], base: usize) -> Result<FetchEntry> {
    let mut entry = FetchEntry::default();
    let mut outside = body;
    let mut prefix = Vec::new();

    if let Some((open, len)) = find_literal(body) {
        let data_start = after_literal_announcement(body, open)
            .ok_or_else(|| parse_error(base + open, "malformed literal announcement"))?;
        let data_end = data_start + len;
        if data_end > body.len() {
            return Err(parse_error(base + open, "literal extends past response"));
        }
        entry.header = Some(body[data_start..data_end].to_vec());

        prefix.extend_from_slice(&body[..open]);
        prefix.extend_from_slice(&body[data_end..]);
        outside = &prefix;
    }

    entry.uid = find_uid_item(outside);
    Ok(entry)
}

/// Finds `UID <n>` among the fetch items.
fn find_uid_item(bytes: &[u8]) -> Option<Uid> {
    let mut i = 0;
    while let Some(pos) = find_subsequence(&bytes[i..], b"UID ") {
        let at = i + pos;
        // Must be the start of an item, not e.g. the tail of "OLDUID".
        let boundary = at == 0 || matches!(bytes[at - 1], b'(' | b' ');
        if boundary {
            let digits: Vec<u8> = bytes[at + 4..]
                .iter()
                .copied()
                .take_while(u8::is_ascii_digit)
                .collect();
            if let Ok(n) = ascii_number(&digits) {
                return Uid::new(n);
            }
        }
        i = at + 4;
    }
    None
}

/// Locates a literal announcement `{n}` and returns (offset, length).
fn find_literal(bytes: &[u8]) -> Option<(usize, usize)> {
    let open = bytes.iter().position(|&b| b == b'{')?;
    let close = bytes[open..].iter().position(|&b| b == b'}')? + open;
    let len = ascii_number(&bytes[open + 1..close]).ok()?;
    Some((open, usize::try_from(len).ok()?))
}

/// Returns the offset just past `{n}\r\n`.
fn after_literal_announcement(bytes: &[u8], open: usize) -> Option<usize> {
    let close = bytes[open..].iter().position(|&b| b == b'}')? + open;
    if bytes.get(close + 1) == Some(&b'\r') && bytes.get(close + 2) == Some(&b'\n') {
        Some(close + 3)
    } else {
        None
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Splits off a bracketed response code, if present, and the trailing text.
fn parse_code_and_text(bytes: &[u8]) -> (Option<ResponseCode>, String) {
    if let Some(rest) = bytes.strip_prefix(b"[") {
        if let Some(close) = rest.iter().position(|&b| b == b']') {
            let code = parse_response_code(&rest[..close]);
            let text = text_after(&rest[close + 1..], 0);
            return (Some(code), text);
        }
    }
    (None, text_after(bytes, 0))
}

fn parse_response_code(inner: &[u8]) -> ResponseCode {
    let (word, after) = next_word(inner);
    match word {
        b"UIDVALIDITY" => {
            let (value, _) = next_word(after);
            ascii_number(value)
                .ok()
                .and_then(UidValidity::new)
                .map_or_else(
                    || ResponseCode::Other(lossy_line(inner)),
                    ResponseCode::UidValidity,
                )
        }
        b"READ-WRITE" => ResponseCode::ReadWrite,
        b"READ-ONLY" => ResponseCode::ReadOnly,
        _ => ResponseCode::Other(lossy_line(inner)),
    }
}

/// Splits the next space-delimited word off a byte slice.
fn next_word(bytes: &[u8]) -> (&[u8], &[u8]) {
    let trimmed = bytes.strip_suffix(b"\r\n").unwrap_or(bytes);
    match trimmed.iter().position(|&b| b == b' ') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
        None => (trimmed, &[]),
    }
}

fn ascii_number(bytes: &[u8]) -> std::result::Result<u32, ()> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(());
    }
    std::str::from_utf8(bytes)
        .map_err(|_| ())?
        .parse()
        .map_err(|_| ())
}

fn status_of(word: &[u8]) -> Status {
    match word {
        b"NO" => Status::No,
        b"BAD" => Status::Bad,
        _ => Status::Ok,
    }
}

fn text_after(bytes: &[u8], skip: usize) -> String {
    let bytes = bytes.get(skip..).unwrap_or(&[]);
    String::from_utf8_lossy(bytes).trim().to_string()
}

fn lossy_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

fn parse_error(position: usize, message: &str) -> Error {
    Error::Parse {
        position,
        message: message.to_string(),
    }
}

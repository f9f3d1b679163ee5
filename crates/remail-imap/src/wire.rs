//! Wire framing for the IMAP protocol.
//!
//! Server output is a sequence of CRLF-terminated lines, where a line may
//! end in a literal announcement `{n}` followed by exactly n raw bytes and
//! then more line data. [`Wire::read_unit`] returns one complete unit,
//! literals included.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::Result;

const READ_CAPACITY: usize = 8192;

/// Longest accepted response line. Header-field fetches stay far below
/// this; anything bigger is a misbehaving server.
const MAX_LINE: usize = 256 * 1024;

/// Largest accepted literal. The client only fetches header fields, so a
/// generous cap still protects against memory exhaustion.
const MAX_LITERAL: usize = 8 * 1024 * 1024;

/// Buffered reader/writer speaking IMAP framing over any stream.
pub struct Wire<S> {
    reader: BufReader<S>,
    out: BytesMut,
}

impl<S> Wire<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_CAPACITY, stream),
            out: BytesMut::with_capacity(READ_CAPACITY),
        }
    }

    /// Reads one complete response unit, following literal continuations.
    pub async fn read_unit(&mut self) -> Result<Vec<u8>> {
        let mut unit = Vec::new();

        loop {
            let line_start = unit.len();
            self.read_line_into(&mut unit).await?;

            match trailing_literal(&unit[line_start..]) {
                Some(len) if len > MAX_LITERAL => {
                    return Err(crate::Error::Protocol(format!(
                        "literal of {len} bytes exceeds cap of {MAX_LITERAL}"
                    )));
                }
                Some(len) => {
                    let mut literal = vec![0u8; len];
                    self.reader.read_exact(&mut literal).await?;
                    unit.extend_from_slice(&literal);
                }
                None => break,
            }
        }

        Ok(unit)
    }

    /// Appends one CRLF-terminated line to `unit`.
    async fn read_line_into(&mut self, unit: &mut Vec<u8>) -> Result<()> {
        let start = unit.len();

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Err(crate::Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed by server",
                )));
            }

            if let Some(pos) = crlf_position(buf) {
                unit.extend_from_slice(&buf[..pos + 2]);
                self.reader.consume(pos + 2);
                return Ok(());
            }

            let len = buf.len();
            unit.extend_from_slice(buf);
            self.reader.consume(len);

            if unit.len() - start > MAX_LINE {
                return Err(crate::Error::Protocol("response line too long".to_string()));
            }
        }
    }

    /// Writes a serialized command and flushes.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.out.clear();
        self.out.extend_from_slice(data);

        let stream = self.reader.get_mut();
        stream.write_all(&self.out).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Reads response units until the one tagged with `tag`, inclusive.
    ///
    /// The tagged unit is always the last element of the returned vector.
    pub async fn read_exchange(&mut self, tag: &str) -> Result<Vec<Vec<u8>>> {
        let mut units = Vec::new();

        loop {
            let unit = self.read_unit().await?;
            let tagged = unit
                .get(..tag.len())
                .is_some_and(|prefix| prefix == tag.as_bytes())
                && unit.get(tag.len()).is_some_and(|&b| b == b' ');

            units.push(unit);
            if tagged {
                return Ok(units);
            }
        }
    }
}

/// Finds the first CRLF in a buffer.
fn crlf_position(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Returns the byte count of a literal announced at the end of a line.
///
/// Recognizes `... {123}\r\n` and the non-synchronizing `... {123+}\r\n`.
fn trailing_literal(line: &[u8]) -> Option<usize> {
    let line = line.strip_suffix(b"\r\n")?;
    let line = line.strip_suffix(b"}")?;

    let open = line.iter().rposition(|&b| b == b'{')?;
    let inner = &line[open + 1..];
    let digits = inner.strip_suffix(b"+").unwrap_or(inner);

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

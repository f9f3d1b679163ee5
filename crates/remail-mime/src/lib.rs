//! # remail-mime
//!
//! Just enough MIME to read the header block of a message: unfolding,
//! case-insensitive lookup, RFC 2047 encoded-word decoding, best-effort
//! sender address extraction and RFC 2822 date parsing.
//!
//! This is deliberately not a full RFC 5322 parser; remail only ever
//! looks at `From`, `Subject` and `Date`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod date;
mod encoding;
mod error;
mod header;

pub use address::extract_address;
pub use date::parse_date;
pub use encoding::{decode_base64, decode_header_value, decode_quoted_printable};
pub use error::{Error, Result};
pub use header::HeaderBlock;

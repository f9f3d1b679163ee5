//! # remail-imap
//!
//! Minimal async IMAP4rev1 client used by remail to clean up a mailbox.
//!
//! The crate deliberately implements only the slice of the protocol the
//! tool drives: greeting, LOGIN, SELECT, UID SEARCH, header-only UID FETCH,
//! UID STORE of the `\Deleted` flag, EXPUNGE, CLOSE, LOGOUT and NOOP.
//! Responses outside that slice are tolerated and skipped, never errors.
//!
//! The client is a typestate machine: [`Client`] starts `NotAuthenticated`,
//! `login` moves it to `Authenticated`, `select` to `Selected`. Operations
//! that require a selected mailbox simply do not exist on the earlier
//! states.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod command;
mod config;
mod error;
mod response;
mod stream;
mod tag;
mod types;
mod wire;

pub use client::{Authenticated, Client, NotAuthenticated, Selected, SelectedMailbox};
pub use command::Command;
pub use config::ConnectConfig;
pub use error::{Error, Result};
pub use response::{FetchEntry, Response, ResponseCode, ServerData};
pub use stream::{ImapStream, connect};
pub use tag::TagSequence;
pub use types::{Flag, SeqNum, Status, Uid, UidSet, UidValidity};
pub use wire::Wire;

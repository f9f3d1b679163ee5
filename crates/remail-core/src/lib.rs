//! # remail-core
//!
//! Core logic for the remail mailbox cleanup tool:
//! - Session lifecycle against the IMAP server (connect, open INBOX
//!   read-write, disconnect), one fresh session per operation
//! - Header-only message retrieval and concurrent parsing
//! - Sender-membership and age filtering
//! - Two-phase deletion (flag with `\Deleted`, then expunge)
//! - Per-sender statistics over a fixed one-year window
//! - The persisted watched-sender list

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod delete;
mod error;
mod fetch;
mod filter;
mod record;
mod senders;
mod session;
mod stats;

pub use client::{DEFAULT_DAYS_OLD, MailboxClient};
pub use config::{AppConfig, HttpConfig, ImapConfig};
pub use delete::delete_messages;
pub use error::{Error, Result};
pub use fetch::fetch_all;
pub use filter::matches;
pub use record::{MessageId, MessageRecord};
pub use senders::SenderStore;
pub use session::{SelectedClient, Session, SessionManager};
pub use stats::{MailboxStats, STATS_WINDOW_DAYS, aggregate};

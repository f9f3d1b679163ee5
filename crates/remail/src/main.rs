//! `remail` - bulk mailbox cleanup over IMAP.
//!
//! Maintains a watched-sender list and deletes old messages from those
//! senders in one mailbox. Every command prints a single JSON object.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod api;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remail_core::{AppConfig, DEFAULT_DAYS_OLD, MailboxClient, MessageId, SenderStore};

const USAGE: &str = "\
usage: remail [--config <path>] <command>

commands:
  senders list             show the watched-sender list
  senders add <address>    add a watched sender
  senders remove <address> remove a watched sender
  list [days]              list messages from watched senders older
                           than <days> (default 30)
  delete <uid[@gen]>...    delete the identified messages
  stats                    per-sender counts over the last year
  test                     verify server connectivity and credentials
";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remail=info,remail_core=info,remail_imap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The failure envelope goes to stdout like every other
            // response; printing it can only fail on a broken pipe.
            let _ = api::print(&api::Outcome::failure(format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = take_config_flag(&mut args)?;

    if args.is_empty() {
        bail!("no command given\n{USAGE}");
    }

    let config_path = match config_path {
        Some(path) => path,
        None => AppConfig::default_path().context("no configuration directory available")?,
    };
    let config = AppConfig::load(&config_path)?;
    let senders_path = config_path.with_file_name("senders.json");
    let client = MailboxClient::new(&config, SenderStore::new(senders_path));

    info!(command = %args[0], "dispatching");
    let rest: Vec<&str> = args.iter().map(String::as_str).collect();
    match rest.as_slice() {
        ["senders", "list"] => {
            api::print(&api::Senders::new(client.list_senders().await?))
        }
        ["senders", "add", address] => {
            let changed = client.add_sender(address).await?;
            api::print(&api::SenderChange::new(changed, client.list_senders().await?))
        }
        ["senders", "remove", address] => {
            let changed = client.remove_sender(address).await?;
            api::print(&api::SenderChange::new(changed, client.list_senders().await?))
        }
        ["list"] => {
            api::print(&api::Emails::new(
                client.list_matching_emails(DEFAULT_DAYS_OLD).await?,
            ))
        }
        ["list", days] => {
            let days: i64 = days
                .parse()
                .with_context(|| format!("invalid day count {days:?}"))?;
            api::print(&api::Emails::new(client.list_matching_emails(days).await?))
        }
        ["delete", ids @ ..] if !ids.is_empty() => {
            let ids = ids
                .iter()
                .map(|s| parse_message_id(s))
                .collect::<Result<Vec<_>>>()?;
            api::print(&api::Deleted::new(client.delete_emails(&ids).await?))
        }
        ["delete"] => bail!("delete requires at least one message identifier"),
        ["stats"] => api::print(&api::Stats::new(client.get_stats().await?)),
        ["test"] => {
            client.test_connection().await?;
            api::print(&api::Outcome::ok("connection and credentials verified"))
        }
        _ => bail!("unknown command {:?}\n{USAGE}", rest.join(" ")),
    }
}

/// Removes a leading `--config <path>` pair from the argument list.
fn take_config_flag(args: &mut Vec<String>) -> Result<Option<PathBuf>> {
    if args.first().map(String::as_str) != Some("--config") {
        return Ok(None);
    }
    if args.len() < 2 {
        bail!("--config requires a path\n{USAGE}");
    }
    args.remove(0);
    Ok(Some(PathBuf::from(args.remove(0))))
}

/// Parses `uid` or `uid@generation` into a [`MessageId`].
///
/// A bare UID carries generation 0, which skips the staleness check.
fn parse_message_id(s: &str) -> Result<MessageId> {
    let (uid, generation) = match s.split_once('@') {
        Some((uid, generation)) => (
            uid,
            generation
                .parse()
                .with_context(|| format!("invalid generation in {s:?}"))?,
        ),
        None => (s, 0),
    };
    let uid: u32 = uid.parse().with_context(|| format!("invalid UID in {s:?}"))?;
    if uid == 0 {
        bail!("UID must be positive in {s:?}");
    }
    Ok(MessageId { uid, generation })
}

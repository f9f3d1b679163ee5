//! Session lifecycle against the mail server.
//!
//! [`SessionManager`] is a factory: every call to [`SessionManager::connect`]
//! produces a fresh [`Session`] that has reached Ready, meaning the
//! transport is up, LOGIN succeeded and INBOX is open read-write.
//! Sessions are never pooled or reused across operations, and there is
//! no automatic reconnection; a failed session is surfaced once and the
//! caller decides whether to start over.
//!
//! [`Session`] is generic over the stream so the fetch and deletion
//! pipelines can run against a scripted transport in tests.

use std::mem;

use remail_imap::{Client, ImapStream, Selected, SelectedMailbox, UidValidity};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::timeout;

use crate::config::ImapConfig;
use crate::{Error, Result};

/// An IMAP client with a mailbox selected.
pub type SelectedClient<S = ImapStream> = Client<S, Selected>;

const MAILBOX: &str = "INBOX";

/// Produces one Ready session per call.
#[derive(Debug, Clone)]
pub struct SessionManager {
    config: ImapConfig,
}

impl SessionManager {
    /// Creates a factory for the configured server.
    #[must_use]
    pub const fn new(config: ImapConfig) -> Self {
        Self { config }
    }

    /// Connects, authenticates and opens INBOX read-write.
    ///
    /// The transport and greeting phase runs under the connect deadline,
    /// LOGIN under the auth deadline.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] for transport or greeting failure,
    /// [`Error::Timeout`] for an elapsed deadline, [`Error::Auth`] for
    /// rejected credentials, [`Error::MailboxOpen`] when INBOX cannot be
    /// opened read-write.
    pub async fn connect(&self) -> Result<Session> {
        let connect_deadline = self.config.connect_timeout();
        let auth_deadline = self.config.auth_timeout();
        let transport = self.config.connect_config();

        tracing::debug!(host = %self.config.host, port = self.config.port, "connecting");
        let stream = timeout(connect_deadline, remail_imap::connect(&transport))
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "connect to {}:{} exceeded {connect_deadline:?}",
                    self.config.host, self.config.port
                ))
            })?
            .map_err(|e| Error::Connection(e.to_string()))?;

        let client = timeout(connect_deadline, Client::from_stream(stream))
            .await
            .map_err(|_| {
                Error::Timeout(format!("server greeting exceeded {connect_deadline:?}"))
            })?
            .map_err(|e| Error::Connection(e.to_string()))?;

        let client = timeout(
            auth_deadline,
            client.login(&self.config.username, &self.config.password),
        )
        .await
        .map_err(|_| Error::Timeout(format!("authentication exceeded {auth_deadline:?}")))?
        .map_err(|e| match e {
            remail_imap::Error::Auth(text) => Error::Auth(text),
            other => Error::Connection(other.to_string()),
        })?;

        let (client, mailbox) = client
            .select(MAILBOX)
            .await
            .map_err(|e| Error::MailboxOpen(e.to_string()))?;
        if mailbox.read_only {
            if let Err(e) = client.logout().await {
                tracing::debug!(error = %e, "logout after read-only select failed");
            }
            return Err(Error::MailboxOpen(format!("{MAILBOX} opened read-only")));
        }

        tracing::info!(
            exists = mailbox.exists,
            uid_validity = ?mailbox.uid_validity,
            "session ready"
        );
        Ok(Session::ready(client, mailbox))
    }
}

enum SessionState<S> {
    Ready {
        client: Box<SelectedClient<S>>,
        mailbox: SelectedMailbox,
    },
    /// Transient during disconnect.
    Closing,
    Disconnected,
}

/// A Ready session over the opened mailbox.
pub struct Session<S = ImapStream> {
    state: SessionState<S>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-established client in a Ready session.
    ///
    /// The factory uses this after its connect sequence; tests use it
    /// with a scripted transport.
    #[must_use]
    pub fn ready(client: SelectedClient<S>, mailbox: SelectedMailbox) -> Self {
        Self {
            state: SessionState::Ready {
                client: Box::new(client),
                mailbox,
            },
        }
    }

    /// UIDVALIDITY of the open mailbox, the generation token for every
    /// identifier obtained through this session.
    #[must_use]
    pub fn generation(&self) -> Option<UidValidity> {
        match &self.state {
            SessionState::Ready { mailbox, .. } => mailbox.uid_validity,
            SessionState::Closing | SessionState::Disconnected => None,
        }
    }

    /// Message count reported at SELECT time.
    #[must_use]
    pub fn message_count(&self) -> Option<u32> {
        match &self.state {
            SessionState::Ready { mailbox, .. } => Some(mailbox.exists),
            SessionState::Closing | SessionState::Disconnected => None,
        }
    }

    /// True until [`Session::disconnect`] runs.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Ready { .. })
    }

    /// The protocol client, for issuing commands.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] when the session is disconnected.
    pub fn client_mut(&mut self) -> Result<&mut SelectedClient<S>> {
        match &mut self.state {
            SessionState::Ready { client, .. } => Ok(client),
            SessionState::Closing | SessionState::Disconnected => Err(Error::Connection(
                "session is not connected".to_string(),
            )),
        }
    }

    /// Logs out and drops the transport. Idempotent; calling it on an
    /// already-closed session does nothing and never fails.
    pub async fn disconnect(&mut self) {
        match mem::replace(&mut self.state, SessionState::Closing) {
            SessionState::Ready { client, .. } => {
                if let Err(e) = client.logout().await {
                    tracing::debug!(error = %e, "logout failed, dropping transport");
                }
            }
            SessionState::Closing | SessionState::Disconnected => {}
        }
        self.state = SessionState::Disconnected;
    }
}

//! The high-level mailbox client.
//!
//! Every operation opens its own session through the factory and
//! disconnects it on every exit path. Nothing is shared between
//! operations, so concurrent calls cannot interfere with each other at
//! the cost of repeated connect/login overhead.

use chrono::{Duration, Utc};

use crate::config::AppConfig;
use crate::record::{MessageId, MessageRecord};
use crate::senders::SenderStore;
use crate::session::SessionManager;
use crate::stats::{MailboxStats, STATS_WINDOW_DAYS};
use crate::{Result, delete, fetch, filter, stats};

/// Default browsing window when the caller does not supply one.
pub const DEFAULT_DAYS_OLD: i64 = 30;

/// Facade over session, fetch, filter, delete and stats.
pub struct MailboxClient {
    sessions: SessionManager,
    senders: SenderStore,
}

impl MailboxClient {
    /// Builds the client from the immutable process configuration.
    #[must_use]
    pub fn new(config: &AppConfig, senders: SenderStore) -> Self {
        Self {
            sessions: SessionManager::new(config.imap.clone()),
            senders,
        }
    }

    /// The watched-sender list, in stored order.
    ///
    /// # Errors
    ///
    /// Propagates sender store failures.
    pub async fn list_senders(&self) -> Result<Vec<String>> {
        self.senders.list().await
    }

    /// Adds a watched sender. False means it was already present.
    ///
    /// # Errors
    ///
    /// Propagates sender store failures.
    pub async fn add_sender(&self, address: &str) -> Result<bool> {
        self.senders.add(address).await
    }

    /// Removes a watched sender. False means it was not present.
    ///
    /// # Errors
    ///
    /// Propagates sender store failures.
    pub async fn remove_sender(&self, address: &str) -> Result<bool> {
        self.senders.remove(address).await
    }

    /// Lists messages from watched senders older than `days_old` days.
    ///
    /// # Errors
    ///
    /// Session and fetch errors propagate; see [`crate::Error`].
    pub async fn list_matching_emails(&self, days_old: i64) -> Result<Vec<MessageRecord>> {
        let senders = self.senders.list().await?;
        let cutoff = Utc::now() - Duration::days(days_old);

        let mut session = self.sessions.connect().await?;
        let fetched = fetch::fetch_all(&mut session).await;
        session.disconnect().await;

        let records = fetched?;
        Ok(records
            .into_iter()
            .filter(|r| filter::matches(r, &senders, cutoff))
            .collect())
    }

    /// Deletes the identified messages.
    ///
    /// An empty identifier set returns an empty result immediately,
    /// without opening a session.
    ///
    /// On success the requested set is echoed back; the server is not
    /// re-queried to confirm removal.
    ///
    /// # Errors
    ///
    /// Session, flag and expunge errors propagate; see [`crate::Error`].
    pub async fn delete_emails(&self, ids: &[MessageId]) -> Result<Vec<MessageId>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut session = self.sessions.connect().await?;
        delete::delete_messages(&mut session, ids).await
    }

    /// Per-sender counts over the fixed one-year window.
    ///
    /// # Errors
    ///
    /// Session and fetch errors propagate; see [`crate::Error`].
    pub async fn get_stats(&self) -> Result<MailboxStats> {
        let senders = self.senders.list().await?;
        let cutoff = Utc::now() - Duration::days(STATS_WINDOW_DAYS);

        let mut session = self.sessions.connect().await?;
        let fetched = fetch::fetch_all(&mut session).await;
        session.disconnect().await;

        Ok(stats::aggregate(&fetched?, &senders, cutoff))
    }

    /// Verifies the server is reachable and the credentials work.
    ///
    /// # Errors
    ///
    /// Connection, authentication and mailbox-open errors propagate.
    pub async fn test_connection(&self) -> Result<()> {
        let mut session = self.sessions.connect().await?;
        let outcome = match session.client_mut() {
            Ok(client) => client
                .noop()
                .await
                .map_err(|e| crate::Error::Connection(e.to_string())),
            Err(e) => Err(e),
        };
        session.disconnect().await;
        outcome
    }
}

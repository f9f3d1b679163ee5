//! Typestate IMAP client.
//!
//! A [`Client`] starts out `NotAuthenticated`, becomes `Authenticated`
//! after a successful LOGIN and `Selected` after SELECT. Each transition
//! consumes the client, so commands that are illegal in a state cannot be
//! expressed.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::command::Command;
use crate::response::{FetchEntry, Response, ResponseCode, ServerData};
use crate::tag::TagSequence;
use crate::types::{Flag, SeqNum, Status, Uid, UidSet, UidValidity};
use crate::wire::Wire;
use crate::{Error, Result};

/// Connection established, no credentials presented yet.
pub struct NotAuthenticated;

/// LOGIN accepted.
pub struct Authenticated;

/// A mailbox is selected; message commands are legal.
pub struct Selected;

/// IMAP client over any async stream.
pub struct Client<S, State = NotAuthenticated> {
    wire: Wire<S>,
    tags: TagSequence,
    _state: PhantomData<State>,
}

/// What SELECT reported about the mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMailbox {
    /// Number of messages in the mailbox.
    pub exists: u32,
    /// UIDVALIDITY of this selection, when the server reported one.
    pub uid_validity: Option<UidValidity>,
    /// True when the mailbox was opened read-only.
    pub read_only: bool,
}

/// Tagged completion of one command.
struct Completion {
    status: Status,
    code: Option<ResponseCode>,
    text: String,
}

/// Maps a non-OK completion to the matching error.
fn check(completion: Completion) -> Result<Completion> {
    match completion.status {
        Status::Ok => Ok(completion),
        Status::No => Err(Error::No(completion.text)),
        Status::Bad => Err(Error::Bad(completion.text)),
    }
}

impl<S, St> Client<S, St>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Rebuilds the client in a new typestate.
    fn transition<New>(self) -> Client<S, New> {
        Client {
            wire: self.wire,
            tags: self.tags,
            _state: PhantomData,
        }
    }

    /// Sends one command and collects its untagged data and completion.
    ///
    /// A BYE at any point fails the exchange; the server is going away
    /// and the pending command will never complete.
    async fn exchange(&mut self, command: &Command<'_>) -> Result<(Vec<ServerData>, Completion)> {
        let tag = self.tags.next_tag();
        self.wire.send(&command.serialize(&tag)).await?;
        let units = self.wire.read_exchange(&tag).await?;

        let mut data = Vec::new();
        let mut completion = None;
        for unit in &units {
            match Response::parse(unit)? {
                Response::Tagged {
                    tag: t,
                    status,
                    code,
                    text,
                } if t == tag => {
                    completion = Some(Completion { status, code, text });
                }
                Response::Untagged(ServerData::Bye(text)) => return Err(Error::Bye(text)),
                Response::Untagged(d) => data.push(d),
                Response::Tagged { .. } | Response::Continuation(_) => {}
            }
        }

        completion
            .map(|c| (data, c))
            .ok_or_else(|| Error::Protocol("exchange ended without tagged completion".to_string()))
    }

    /// Sends NOOP. Legal in every state.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the command or the
    /// connection fails.
    pub async fn noop(&mut self) -> Result<()> {
        let (_, completion) = self.exchange(&Command::Noop).await?;
        check(completion)?;
        Ok(())
    }

    /// Sends LOGOUT and drops the connection.
    ///
    /// The server answers BYE before the tagged OK; whatever it sends
    /// after LOGOUT is not worth failing over, so read errors are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only when the LOGOUT command cannot be written.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.tags.next_tag();
        self.wire.send(&Command::Logout.serialize(&tag)).await?;
        let _ = self.wire.read_exchange(&tag).await;
        Ok(())
    }
}

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a freshly connected stream and consumes the server greeting.
    ///
    /// # Errors
    ///
    /// Fails when the greeting is BYE or unparseable.
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut wire = Wire::new(stream);
        let greeting = wire.read_unit().await?;

        match Response::parse(&greeting)? {
            Response::Untagged(ServerData::Condition {
                status: Status::Ok, ..
            }) => Ok(Self {
                wire,
                tags: TagSequence::default(),
                _state: PhantomData,
            }),
            Response::Untagged(ServerData::Bye(text)) => Err(Error::Bye(text)),
            _ => Err(Error::Protocol("unexpected server greeting".to_string())),
        }
    }

    /// Authenticates with LOGIN.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when the server rejects the credentials.
    pub async fn login(
        mut self,
        user: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        tracing::debug!(user, "authenticating");
        let (_, completion) = self.exchange(&Command::Login { user, password }).await?;
        match completion.status {
            Status::Ok => Ok(self.transition()),
            Status::No | Status::Bad => Err(Error::Auth(completion.text)),
        }
    }
}

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Selects a mailbox read-write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::No`] or [`Error::Bad`] when the server refuses
    /// the selection.
    pub async fn select(
        mut self,
        mailbox: &str,
    ) -> Result<(Client<S, Selected>, SelectedMailbox)> {
        tracing::debug!(mailbox, "selecting mailbox");
        let (data, completion) = self.exchange(&Command::Select { mailbox }).await?;
        let completion = check(completion)?;

        let mut status = SelectedMailbox {
            exists: 0,
            uid_validity: None,
            read_only: false,
        };
        for item in data {
            match item {
                ServerData::Exists(n) => status.exists = n,
                ServerData::Condition {
                    code: Some(ResponseCode::UidValidity(v)),
                    ..
                } => status.uid_validity = Some(v),
                _ => {}
            }
        }
        if completion.code == Some(ResponseCode::ReadOnly) {
            status.read_only = true;
        }

        Ok((self.transition(), status))
    }
}

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Enumerates every message in the mailbox via `UID SEARCH ALL`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::No`] or [`Error::Bad`] on server rejection.
    pub async fn uid_search_all(&mut self) -> Result<Vec<Uid>> {
        let (data, completion) = self.exchange(&Command::UidSearchAll).await?;
        check(completion)?;

        let mut uids = Vec::new();
        for item in data {
            if let ServerData::Search(mut found) = item {
                uids.append(&mut found);
            }
        }
        Ok(uids)
    }

    /// Fetches the named header fields for every message in the set.
    ///
    /// Returns one entry per FETCH response; the server may omit
    /// messages that vanished since enumeration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::No`] or [`Error::Bad`] on server rejection.
    pub async fn uid_fetch_headers(
        &mut self,
        set: &UidSet,
        fields: &[&str],
    ) -> Result<Vec<FetchEntry>> {
        tracing::debug!(count = set.len(), "fetching headers");
        let (data, completion) = self
            .exchange(&Command::UidFetchHeaders { set, fields })
            .await?;
        check(completion)?;

        Ok(data
            .into_iter()
            .filter_map(|item| match item {
                ServerData::Fetch { entry, .. } => Some(entry),
                _ => None,
            })
            .collect())
    }

    /// Adds flags to every message in the set, silently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::No`] or [`Error::Bad`] on server rejection.
    pub async fn uid_store_add_flags(&mut self, set: &UidSet, flags: &[Flag]) -> Result<()> {
        tracing::debug!(count = set.len(), "storing flags");
        let (_, completion) = self
            .exchange(&Command::UidStoreAddFlags { set, flags })
            .await?;
        check(completion)?;
        Ok(())
    }

    /// Permanently removes `\Deleted` messages.
    ///
    /// Returns the sequence numbers the server reported expunged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::No`] or [`Error::Bad`] on server rejection.
    pub async fn expunge(&mut self) -> Result<Vec<SeqNum>> {
        let (data, completion) = self.exchange(&Command::Expunge).await?;
        check(completion)?;

        Ok(data
            .into_iter()
            .filter_map(|item| match item {
                ServerData::Expunge(seq) => Some(seq),
                _ => None,
            })
            .collect())
    }

    /// Closes the mailbox, returning to the authenticated state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::No`] or [`Error::Bad`] on server rejection.
    pub async fn close(mut self) -> Result<Client<S, Authenticated>> {
        let (_, completion) = self.exchange(&Command::Close).await?;
        check(completion)?;
        Ok(self.transition())
    }
}

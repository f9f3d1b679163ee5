//! Two-phase deletion: flag with `\Deleted`, then expunge.

use remail_imap::{Flag, Uid, UidSet};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::record::MessageId;
use crate::session::Session;
use crate::{Error, Result};

/// Deletes the identified messages from the open mailbox.
///
/// Phases: one batched `UID STORE +FLAGS.SILENT (\Deleted)`, then
/// `EXPUNGE`. The session is disconnected before returning on every
/// path, success or failure. An empty identifier set returns without
/// touching the transport at all; the session stays as it was.
///
/// On success the requested identifier set is returned as-is; the
/// server is not re-queried to confirm which messages actually went
/// away. Callers that need certainty must fetch again.
///
/// # Errors
///
/// [`Error::StaleIdentifiers`] when an identifier's generation does not
/// match the open mailbox, [`Error::Flag`] when the flag phase fails
/// (nothing was expunged), [`Error::Expunge`] when the expunge phase
/// fails after flagging succeeded (delete state unknown).
pub async fn delete_messages<S>(
    session: &mut Session<S>,
    ids: &[MessageId],
) -> Result<Vec<MessageId>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let outcome = run_phases(session, ids).await;
    session.disconnect().await;
    outcome
}

async fn run_phases<S>(session: &mut Session<S>, ids: &[MessageId]) -> Result<Vec<MessageId>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Some(current) = session.generation() {
        if let Some(stale) = ids
            .iter()
            .find(|id| id.generation != 0 && id.generation != current.get())
        {
            return Err(Error::StaleIdentifiers(format!(
                "identifier generation {} does not match mailbox generation {}",
                stale.generation,
                current.get()
            )));
        }
    }

    let uids: Vec<Uid> = ids.iter().filter_map(|id| Uid::new(id.uid)).collect();
    if uids.len() != ids.len() {
        return Err(Error::Flag("identifier with UID 0".to_string()));
    }
    let set = UidSet::new(uids)
        .ok_or_else(|| Error::Flag("empty identifier set".to_string()))?;

    let client = session.client_mut()?;
    client
        .uid_store_add_flags(&set, &[Flag::Deleted])
        .await
        .map_err(|e| Error::Flag(e.to_string()))?;

    let expunged = client
        .expunge()
        .await
        .map_err(|e| Error::Expunge(e.to_string()))?;

    tracing::info!(
        requested = ids.len(),
        expunged = expunged.len(),
        "deletion complete"
    );
    Ok(ids.to_vec())
}

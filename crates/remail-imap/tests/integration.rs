//! Integration tests for the IMAP client.
//!
//! A mock stream replays canned server responses and captures every
//! command the client writes, so whole sessions run without a server.

#![allow(clippy::unwrap_used)]

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use remail_imap::{Client, Error, Flag, Response, ServerData, Status, Uid, UidSet};

/// Mock stream that returns predefined responses and records writes.
struct MockStream {
    responses: Cursor<Vec<u8>>,
    sent: Arc<Mutex<Vec<u8>>>,
}

impl MockStream {
    fn new(responses: &[u8]) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let stream = Self {
            responses: Cursor::new(responses.to_vec()),
            sent: Arc::clone(&sent),
        };
        (stream, sent)
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let pos = usize::try_from(self.responses.position()).unwrap();
        let data = self.responses.get_ref();

        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let remaining = &data[pos..];
        let to_read = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..to_read]);
        self.responses.set_position((pos + to_read) as u64);

        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.sent.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn sent_text(sent: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(sent.lock().unwrap().clone()).unwrap()
}

#[tokio::test]
async fn test_full_cleanup_session() {
    let responses = b"\
* OK IMAP4rev1 ready\r\n\
A0000 OK LOGIN completed\r\n\
* 3 EXISTS\r\n\
* OK [UIDVALIDITY 7] UIDs valid\r\n\
A0001 OK [READ-WRITE] SELECT completed\r\n\
* SEARCH 11 12 13\r\n\
A0002 OK SEARCH completed\r\n\
A0003 OK STORE completed\r\n\
* 1 EXPUNGE\r\n\
* 1 EXPUNGE\r\n\
* 1 EXPUNGE\r\n\
A0004 OK EXPUNGE completed\r\n\
* BYE logging out\r\n\
A0005 OK LOGOUT completed\r\n";
    let (stream, sent) = MockStream::new(responses);

    let client = Client::from_stream(stream).await.unwrap();
    let client = client.login("alice", "secret").await.unwrap();
    let (mut client, mailbox) = client.select("INBOX").await.unwrap();
    assert_eq!(mailbox.exists, 3);
    assert!(!mailbox.read_only);

    let uids = client.uid_search_all().await.unwrap();
    assert_eq!(uids.len(), 3);

    let set = UidSet::new(uids).unwrap();
    client
        .uid_store_add_flags(&set, &[Flag::Deleted])
        .await
        .unwrap();
    let expunged = client.expunge().await.unwrap();
    assert_eq!(expunged.len(), 3);

    client.logout().await.unwrap();

    let commands = sent_text(&sent);
    assert!(commands.contains("A0000 LOGIN alice secret\r\n"));
    assert!(commands.contains("A0001 SELECT INBOX\r\n"));
    assert!(commands.contains("A0002 UID SEARCH ALL\r\n"));
    assert!(commands.contains("A0003 UID STORE 11:13 +FLAGS.SILENT (\\Deleted)\r\n"));
    assert!(commands.contains("A0004 EXPUNGE\r\n"));
    assert!(commands.contains("A0005 LOGOUT\r\n"));
}

#[tokio::test]
async fn test_fetch_header_literal_round_trip() {
    let responses = b"\
* OK ready\r\n\
A0000 OK done\r\n\
A0001 OK [READ-WRITE] done\r\n\
* 1 FETCH (UID 11 BODY[HEADER.FIELDS (FROM SUBJECT DATE)] {25}\r\n\
From: bob@example.com\r\n\r\n)\r\n\
A0002 OK FETCH completed\r\n";
    let (stream, sent) = MockStream::new(responses);

    let client = Client::from_stream(stream).await.unwrap();
    let client = client.login("u", "p").await.unwrap();
    let (mut client, _) = client.select("INBOX").await.unwrap();

    let set = UidSet::new(vec![Uid::new(11).unwrap()]).unwrap();
    let entries = client
        .uid_fetch_headers(&set, &["FROM", "SUBJECT", "DATE"])
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].uid, Uid::new(11));
    assert_eq!(
        entries[0].header.as_deref(),
        Some(b"From: bob@example.com\r\n\r\n".as_slice())
    );
    assert!(sent_text(&sent).contains(
        "A0002 UID FETCH 11 (UID BODY.PEEK[HEADER.FIELDS (FROM SUBJECT DATE)])\r\n"
    ));
}

#[tokio::test]
async fn test_login_rejection_surfaces_as_auth_error() {
    let responses = b"\
* OK ready\r\n\
A0000 NO [AUTHENTICATIONFAILED] bad credentials\r\n";
    let (stream, _sent) = MockStream::new(responses);

    let client = Client::from_stream(stream).await.unwrap();
    let err = client.login("alice", "wrong").await.err().unwrap();
    assert!(matches!(err, Error::Auth(_)));
}

#[tokio::test]
async fn test_truncated_exchange_is_an_error() {
    // The server disappears before the tagged completion arrives.
    let responses = b"\
* OK ready\r\n\
A0000 OK done\r\n\
* SEARCH 4\r\n";
    let (stream, _sent) = MockStream::new(responses);

    let client = Client::from_stream(stream).await.unwrap();
    let client = client.login("u", "p").await.unwrap();
    // SELECT never completes; the truncated stream must fail, not hang.
    assert!(client.select("INBOX").await.is_err());
}

#[test]
fn test_response_parsing_public_surface() {
    let parsed = Response::parse(b"* 5 EXISTS\r\n").unwrap();
    assert!(matches!(
        parsed,
        Response::Untagged(ServerData::Exists(5))
    ));

    let parsed = Response::parse(b"A0003 NO [TRYCREATE] no such mailbox\r\n").unwrap();
    match parsed {
        Response::Tagged { tag, status, .. } => {
            assert_eq!(tag, "A0003");
            assert_eq!(status, Status::No);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

//! Client commands and their wire serialization.

use crate::types::{Flag, UidSet};

/// The commands this client issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `LOGIN user password`
    Login {
        /// Account name.
        user: &'a str,
        /// Account secret.
        password: &'a str,
    },
    /// `SELECT mailbox`
    Select {
        /// Mailbox name, usually "INBOX".
        mailbox: &'a str,
    },
    /// `UID SEARCH ALL`
    UidSearchAll,
    /// `UID FETCH set (UID BODY.PEEK[HEADER.FIELDS (...)])`
    UidFetchHeaders {
        /// Messages to fetch.
        set: &'a UidSet,
        /// Header field names to request.
        fields: &'a [&'a str],
    },
    /// `UID STORE set +FLAGS.SILENT (...)`
    UidStoreAddFlags {
        /// Messages to flag.
        set: &'a UidSet,
        /// Flags to add.
        flags: &'a [Flag],
    },
    /// `EXPUNGE`
    Expunge,
    /// `CLOSE`
    Close,
    /// `LOGOUT`
    Logout,
    /// `NOOP`
    Noop,
}

impl Command<'_> {
    /// Serializes the command with its tag, CRLF included.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');

        match self {
            Self::Login { user, password } => {
                buf.extend_from_slice(b"LOGIN ");
                write_astring(&mut buf, user);
                buf.push(b' ');
                write_astring(&mut buf, password);
            }
            Self::Select { mailbox } => {
                buf.extend_from_slice(b"SELECT ");
                write_astring(&mut buf, mailbox);
            }
            Self::UidSearchAll => {
                buf.extend_from_slice(b"UID SEARCH ALL");
            }
            Self::UidFetchHeaders { set, fields } => {
                buf.extend_from_slice(b"UID FETCH ");
                buf.extend_from_slice(set.to_string().as_bytes());
                buf.extend_from_slice(b" (UID BODY.PEEK[HEADER.FIELDS (");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        buf.push(b' ');
                    }
                    buf.extend_from_slice(field.as_bytes());
                }
                buf.extend_from_slice(b")])");
            }
            Self::UidStoreAddFlags { set, flags } => {
                buf.extend_from_slice(b"UID STORE ");
                buf.extend_from_slice(set.to_string().as_bytes());
                buf.extend_from_slice(b" +FLAGS.SILENT (");
                for (i, flag) in flags.iter().enumerate() {
                    if i > 0 {
                        buf.push(b' ');
                    }
                    buf.extend_from_slice(flag.as_imap().as_bytes());
                }
                buf.push(b')');
            }
            Self::Expunge => buf.extend_from_slice(b"EXPUNGE"),
            Self::Close => buf.extend_from_slice(b"CLOSE"),
            Self::Logout => buf.extend_from_slice(b"LOGOUT"),
            Self::Noop => buf.extend_from_slice(b"NOOP"),
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }
}

/// Writes an astring: a bare atom when safe, a quoted string otherwise.
fn write_astring(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        buf.push(b'"');
        for b in s.bytes() {
            if b == b'"' || b == b'\\' {
                buf.push(b'\\');
            }
            buf.push(b);
        }
        buf.push(b'"');
    } else {
        buf.extend_from_slice(s.as_bytes());
    }
}

const fn needs_quoting(b: u8) -> bool {
    matches!(b, b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*') || b < 0x20 || b == 0x7F
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Uid;

    fn set(uids: &[u32]) -> UidSet {
        UidSet::new(uids.iter().map(|&n| Uid::new(n).unwrap()).collect()).unwrap()
    }

    #[test]
    fn test_login_plain_atoms() {
        let cmd = Command::Login {
            user: "alice",
            password: "hunter2",
        };
        assert_eq!(cmd.serialize("A0000"), b"A0000 LOGIN alice hunter2\r\n");
    }

    #[test]
    fn test_login_quotes_specials() {
        let cmd = Command::Login {
            user: "alice@example.com",
            password: "pass word\"x",
        };
        assert_eq!(
            cmd.serialize("A0001"),
            b"A0001 LOGIN alice@example.com \"pass word\\\"x\"\r\n"
        );
    }

    #[test]
    fn test_login_empty_password_quoted() {
        let cmd = Command::Login {
            user: "u",
            password: "",
        };
        assert_eq!(cmd.serialize("A0002"), b"A0002 LOGIN u \"\"\r\n");
    }

    #[test]
    fn test_select() {
        let cmd = Command::Select { mailbox: "INBOX" };
        assert_eq!(cmd.serialize("A0003"), b"A0003 SELECT INBOX\r\n");
    }

    #[test]
    fn test_select_quoted_mailbox() {
        let cmd = Command::Select {
            mailbox: "Old Mail",
        };
        assert_eq!(cmd.serialize("A0004"), b"A0004 SELECT \"Old Mail\"\r\n");
    }

    #[test]
    fn test_uid_search_all() {
        assert_eq!(
            Command::UidSearchAll.serialize("A0005"),
            b"A0005 UID SEARCH ALL\r\n"
        );
    }

    #[test]
    fn test_uid_fetch_headers() {
        let s = set(&[1, 2, 3, 9]);
        let cmd = Command::UidFetchHeaders {
            set: &s,
            fields: &["FROM", "SUBJECT", "DATE"],
        };
        assert_eq!(
            cmd.serialize("A0006"),
            b"A0006 UID FETCH 1:3,9 (UID BODY.PEEK[HEADER.FIELDS (FROM SUBJECT DATE)])\r\n"
                .to_vec()
        );
    }

    #[test]
    fn test_uid_store_deleted_silent() {
        let s = set(&[4, 8]);
        let cmd = Command::UidStoreAddFlags {
            set: &s,
            flags: &[Flag::Deleted],
        };
        assert_eq!(
            cmd.serialize("A0007"),
            b"A0007 UID STORE 4,8 +FLAGS.SILENT (\\Deleted)\r\n"
        );
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(Command::Expunge.serialize("A1"), b"A1 EXPUNGE\r\n");
        assert_eq!(Command::Close.serialize("A2"), b"A2 CLOSE\r\n");
        assert_eq!(Command::Logout.serialize("A3"), b"A3 LOGOUT\r\n");
        assert_eq!(Command::Noop.serialize("A4"), b"A4 NOOP\r\n");
    }
}

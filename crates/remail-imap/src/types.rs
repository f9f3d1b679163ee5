//! Protocol value types: message identifiers, UID sets, flags, statuses.

use std::fmt;
use std::num::NonZeroU32;

/// Message sequence number, valid only within one selected mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeqNum(NonZeroU32);

/// Unique identifier of a message, stable within one UIDVALIDITY epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(NonZeroU32);

/// The UIDVALIDITY value a mailbox reports at SELECT time.
///
/// When this changes between sessions, all previously obtained [`Uid`]s
/// are void.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UidValidity(NonZeroU32);

macro_rules! nonzero_id {
    ($name:ident) => {
        impl $name {
            /// Creates the identifier; zero is not a valid value.
            #[must_use]
            pub const fn new(value: u32) -> Option<Self> {
                match NonZeroU32::new(value) {
                    Some(n) => Some(Self(n)),
                    None => None,
                }
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

nonzero_id!(SeqNum);
nonzero_id!(Uid);
nonzero_id!(UidValidity);

/// A non-empty set of UIDs, rendered in the compact IMAP set syntax.
///
/// Construction sorts and deduplicates; display coalesces runs into
/// ranges, so `[3, 1, 2, 7]` renders as `1:3,7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidSet(Vec<Uid>);

impl UidSet {
    /// Builds a set from the given UIDs. Returns `None` when empty.
    #[must_use]
    pub fn new(mut uids: Vec<Uid>) -> Option<Self> {
        if uids.is_empty() {
            return None;
        }
        uids.sort_unstable();
        uids.dedup();
        Some(Self(uids))
    }

    /// The UIDs in ascending order.
    #[must_use]
    pub fn uids(&self) -> &[Uid] {
        &self.0
    }

    /// Number of UIDs in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; empty sets cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UidSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut i = 0;
        while i < self.0.len() {
            // Extend a run of consecutive UIDs as far as it goes.
            let start = self.0[i].get();
            let mut end = start;
            while i + 1 < self.0.len() && self.0[i + 1].get() == end + 1 {
                end += 1;
                i += 1;
            }

            if !first {
                write!(f, ",")?;
            }
            first = false;
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}:{end}")?;
            }
            i += 1;
        }
        Ok(())
    }
}

/// Message flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flag {
    /// `\Seen`
    Seen,
    /// `\Answered`
    Answered,
    /// `\Flagged`
    Flagged,
    /// `\Deleted`
    Deleted,
    /// `\Draft`
    Draft,
    /// Any other keyword flag.
    Keyword(String),
}

impl Flag {
    /// The flag's wire representation.
    #[must_use]
    pub fn as_imap(&self) -> &str {
        match self {
            Self::Seen => "\\Seen",
            Self::Answered => "\\Answered",
            Self::Flagged => "\\Flagged",
            Self::Deleted => "\\Deleted",
            Self::Draft => "\\Draft",
            Self::Keyword(k) => k,
        }
    }
}

/// Status of a tagged or untagged condition response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command succeeded.
    Ok,
    /// Command failed.
    No,
    /// Command was malformed or inappropriate.
    Bad,
}

impl Status {
    /// True for [`Status::Ok`].
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn uid(n: u32) -> Uid {
        Uid::new(n).unwrap()
    }

    #[test]
    fn test_zero_rejected() {
        assert!(Uid::new(0).is_none());
        assert!(SeqNum::new(0).is_none());
        assert!(UidValidity::new(0).is_none());
        assert_eq!(uid(9).get(), 9);
    }

    #[test]
    fn test_uid_set_empty() {
        assert!(UidSet::new(Vec::new()).is_none());
    }

    #[test]
    fn test_uid_set_single() {
        let set = UidSet::new(vec![uid(5)]).unwrap();
        assert_eq!(set.to_string(), "5");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_uid_set_coalesces_runs() {
        let set = UidSet::new(vec![uid(3), uid(1), uid(2), uid(7)]).unwrap();
        assert_eq!(set.to_string(), "1:3,7");
    }

    #[test]
    fn test_uid_set_dedup() {
        let set = UidSet::new(vec![uid(4), uid(4), uid(5)]).unwrap();
        assert_eq!(set.to_string(), "4:5");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_flag_wire_form() {
        assert_eq!(Flag::Deleted.as_imap(), "\\Deleted");
        assert_eq!(Flag::Keyword("$Junk".to_string()).as_imap(), "$Junk");
    }
}

//! Command tag generation.
//!
//! Every command carries a tag the server echoes back in its completion
//! response; tags let the client pair requests with results.

use std::sync::atomic::{AtomicU32, Ordering};

/// Sequential tag generator ("A0000", "A0001", ...).
#[derive(Debug)]
pub struct TagSequence {
    counter: AtomicU32,
    prefix: char,
}

impl TagSequence {
    /// Creates a generator with the given prefix character.
    #[must_use]
    pub const fn new(prefix: char) -> Self {
        Self {
            counter: AtomicU32::new(0),
            prefix,
        }
    }

    /// Returns the next tag.
    #[must_use]
    pub fn next_tag(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{:04}", self.prefix, n)
    }
}

impl Default for TagSequence {
    fn default() -> Self {
        Self::new('A')
    }
}

#![forbid(unsafe_code)]

//! Identity tokens for pages and page stacks.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a single page snapshot.
///
/// Page identities are assigned by whoever creates the page: restored
/// sessions carry their persisted ids, freshly opened pages take the next
/// process-wide token from [`PageId::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageId(u64);

static NEXT_PAGE_ID: AtomicU64 = AtomicU64::new(0);

impl PageId {
    /// Create an id from a raw value (e.g. one read back from storage).
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocate the next process-wide unique id.
    pub fn next() -> Self {
        Self(NEXT_PAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw token value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Identity of a page stack (one card in the deck).
///
/// Monotonically unique for the lifetime of the process. Stack identities
/// are stable across structural edits of the deck: moving or re-wrapping a
/// card never changes its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageStackId(u64);

static NEXT_STACK_ID: AtomicU64 = AtomicU64::new(0);

impl PageStackId {
    /// Create an id from a raw value (e.g. one read back from storage).
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocate the next process-wide unique id.
    pub fn next() -> Self {
        Self(NEXT_STACK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw token value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageStackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_unique() {
        let a = PageStackId::next();
        let b = PageStackId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn from_raw_round_trips() {
        assert_eq!(PageId::from_raw(42).raw(), 42);
        assert_eq!(PageStackId::from_raw(7).raw(), 7);
    }

    #[test]
    fn display_is_tagged() {
        assert_eq!(PageId::from_raw(3).to_string(), "page#3");
        assert_eq!(PageStackId::from_raw(3).to_string(), "stack#3");
    }
}

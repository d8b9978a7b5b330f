#![forbid(unsafe_code)]

//! The page model: opaque page payloads plus their saved snapshots.

use crate::id::PageId;

/// Discriminator used by the page-content registry to look up the state
/// factory and renderer for a page payload.
pub type PageKind = &'static str;

/// A page payload carried by a [`PageStack`](crate::PageStack).
///
/// The deck core never branches on concrete page types; it only forwards
/// [`Page::kind`] to the content registry and moves payloads around
/// opaquely.
pub trait Page: Clone + std::fmt::Debug + 'static {
    /// Stable discriminator for this payload's runtime type.
    fn kind(&self) -> PageKind;
}

/// A page snapshot: identity plus payload.
///
/// This is what page stacks store. The id stays stable for the lifetime of
/// the page, including across persistence round trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPageState<P> {
    /// Identity of the page.
    pub id: PageId,
    /// The page payload.
    pub page: P,
}

impl<P> SavedPageState<P> {
    /// Create a snapshot from an id and payload.
    pub fn new(id: PageId, page: P) -> Self {
        Self { id, page }
    }
}

impl<P: Page> SavedPageState<P> {
    /// Forward to the payload's kind.
    pub fn kind(&self) -> PageKind {
        self.page.kind()
    }
}

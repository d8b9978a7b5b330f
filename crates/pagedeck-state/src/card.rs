#![forbid(unsafe_code)]

//! Card handles: what the deck tree stores per card.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pagedeck_core::{Page, PageId, PageStack, PageStackId};
use pagedeck_store::StackCell;

/// The per-card content stored in the deck tree.
///
/// A handle carries the card's stable identity, a clone of the shared
/// stack cache cell owned by the persistence collaborator, and the
/// visibility flag used purely to gate enter/exit transitions. Handles are
/// cheap to clone and every clone refers to the same card.
#[derive(Debug, Clone)]
pub struct CardHandle<P> {
    id: PageStackId,
    stack: StackCell<P>,
    visible: Arc<AtomicBool>,
}

impl<P> PartialEq for CardHandle<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P: Page> CardHandle<P> {
    /// Wrap a stack cell in a visible handle.
    pub fn new(stack: StackCell<P>) -> Self {
        Self {
            id: stack.id(),
            stack,
            visible: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Wrap a stack cell in a hidden handle (animated insertion starts
    /// here and flips visible once the reveal fires).
    pub fn hidden(stack: StackCell<P>) -> Self {
        Self {
            id: stack.id(),
            stack,
            visible: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stable identity of this card.
    #[inline]
    pub fn id(&self) -> PageStackId {
        self.id
    }

    /// The shared cache cell for the card's page stack.
    pub fn stack_cell(&self) -> &StackCell<P> {
        &self.stack
    }

    /// Current page-stack value.
    pub fn stack(&self) -> PageStack<P> {
        self.stack.get()
    }

    /// Identity of the topmost page.
    pub fn top_page_id(&self) -> PageId {
        self.stack().head().id
    }

    /// Entry/exit animation gate. Does not affect layout or hit-testing.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    /// Flip the animation gate. Shared across all clones of this handle.
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedeck_core::{PageKind, SavedPageState};

    #[derive(Debug, Clone)]
    struct Note(u64);

    impl Page for Note {
        fn kind(&self) -> PageKind {
            "note"
        }
    }

    fn handle(page_id: u64) -> CardHandle<Note> {
        let stack = PageStack::single(SavedPageState::new(PageId::from_raw(page_id), Note(page_id)));
        CardHandle::new(StackCell::new(stack))
    }

    #[test]
    fn top_page_tracks_the_cell_value() {
        let card = handle(1);
        assert_eq!(card.top_page_id(), PageId::from_raw(1));
        let grown = card.stack().pushed(SavedPageState::new(PageId::from_raw(2), Note(2)));
        card.stack_cell().set(grown);
        assert_eq!(card.top_page_id(), PageId::from_raw(2));
    }

    #[test]
    fn visibility_is_shared_across_clones() {
        let card = handle(1);
        let twin = card.clone();
        card.set_visible(false);
        assert!(!twin.is_visible());
    }

    #[test]
    fn hidden_starts_invisible() {
        let stack = PageStack::single(SavedPageState::new(PageId::from_raw(1), Note(1)));
        let card = CardHandle::hidden(StackCell::new(stack));
        assert!(!card.is_visible());
    }

    #[test]
    fn equality_is_by_identity() {
        let a = handle(1);
        let b = handle(1);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}

#![forbid(unsafe_code)]

//! Page-content registry: page kind to state factory.
//!
//! The deck core never branches on concrete page types. When a card is
//! materialized, each page in its stack is looked up here by
//! [`Page::kind`] and its heavyweight state is built through the
//! registered factory. A page kind reaching materialization without a
//! registration indicates a packaging error, not a recoverable runtime
//! condition, and panics.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use pagedeck_core::{Page, PageKind, SavedPageState};

type StateFactory<P> = Arc<dyn Fn(&SavedPageState<P>) -> Box<dyn Any>>;

/// Registry of per-page-kind state factories.
pub struct PageRegistry<P: Page> {
    factories: HashMap<PageKind, StateFactory<P>>,
}

impl<P: Page> Default for PageRegistry<P> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<P: Page> PageRegistry<P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the state factory for a page kind. A later registration
    /// for the same kind replaces the earlier one.
    pub fn register(
        &mut self,
        kind: PageKind,
        factory: impl Fn(&SavedPageState<P>) -> Box<dyn Any> + 'static,
    ) {
        self.factories.insert(kind, Arc::new(factory));
    }

    /// Whether a factory is registered for `kind`.
    pub fn is_registered(&self, kind: PageKind) -> bool {
        self.factories.contains_key(kind)
    }

    /// Number of registered page kinds.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build the heavyweight state for one page.
    ///
    /// # Panics
    ///
    /// Panics when the page's kind has no registered factory.
    pub fn create_state(&self, page: &SavedPageState<P>) -> Box<dyn Any> {
        let kind = page.kind();
        let factory = self.factories.get(kind).unwrap_or_else(|| {
            panic!("no page content registered for kind `{kind}`")
        });
        factory(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedeck_core::PageId;

    #[derive(Debug, Clone)]
    struct Note(u64);

    impl Page for Note {
        fn kind(&self) -> PageKind {
            "note"
        }
    }

    struct NoteState(u64);

    fn registry() -> PageRegistry<Note> {
        let mut registry = PageRegistry::new();
        registry.register("note", |page| Box::new(NoteState(page.id.raw())));
        registry
    }

    #[test]
    fn registered_factory_builds_typed_state() {
        let registry = registry();
        let page = SavedPageState::new(PageId::from_raw(7), Note(7));
        let state = registry.create_state(&page);
        assert_eq!(state.downcast_ref::<NoteState>().unwrap().0, 7);
    }

    #[test]
    fn is_registered_reflects_registration() {
        let registry = registry();
        assert!(registry.is_registered("note"));
        assert!(!registry.is_registered("timeline"));
    }

    #[test]
    #[should_panic(expected = "no page content registered for kind `note`")]
    fn missing_registration_panics() {
        let registry: PageRegistry<Note> = PageRegistry::new();
        let page = SavedPageState::new(PageId::from_raw(1), Note(1));
        let _ = registry.create_state(&page);
    }
}

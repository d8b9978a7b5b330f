#![forbid(unsafe_code)]

//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::shape::DeckShape;
use crate::{DeckRepository, PageStackRepository, StackCell, StorageError, StorageResult};
use pagedeck_core::{PageStack, PageStackId};

/// An in-process store implementing both repository contracts.
///
/// Stacks live as shared [`StackCell`]s keyed by identity; the deck shape
/// is kept in its JSON wire form so load exercises the same decode path a
/// durable backend would.
pub struct MemoryStore<P> {
    stacks: RwLock<HashMap<PageStackId, StackCell<P>>>,
    deck: RwLock<Option<String>>,
}

impl<P> Default for MemoryStore<P> {
    fn default() -> Self {
        Self {
            stacks: RwLock::new(HashMap::new()),
            deck: RwLock::new(None),
        }
    }
}

impl<P> MemoryStore<P> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the raw persisted deck payload.
    ///
    /// Bypasses encoding, so corrupt payloads can be planted to exercise
    /// the recovery path. Primarily for tests.
    pub fn set_raw_deck(&self, raw: impl Into<String>) {
        *self.deck.write().expect("deck record lock poisoned") = Some(raw.into());
    }

    /// Number of stored stacks.
    pub fn stack_count(&self) -> usize {
        self.stacks.read().expect("stack table lock poisoned").len()
    }
}

impl<P: Clone> PageStackRepository<P> for MemoryStore<P> {
    fn save_stack(&self, stack: &PageStack<P>) -> StorageResult<StackCell<P>> {
        let mut table = self.stacks.write().expect("stack table lock poisoned");
        let cell = table
            .entry(stack.id())
            .and_modify(|cell| cell.set(stack.clone()))
            .or_insert_with(|| StackCell::new(stack.clone()));
        debug!(id = %stack.id(), pages = stack.len(), "saved page stack");
        Ok(cell.clone())
    }

    fn load_stack(&self, id: PageStackId) -> StorageResult<StackCell<P>> {
        self.stacks
            .read()
            .expect("stack table lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete_all_stacks(&self) -> StorageResult<()> {
        self.stacks
            .write()
            .expect("stack table lock poisoned")
            .clear();
        Ok(())
    }
}

impl<P> DeckRepository for MemoryStore<P> {
    fn save_deck(&self, shape: &DeckShape) -> StorageResult<()> {
        let json = shape.to_json()?;
        *self.deck.write().expect("deck record lock poisoned") = Some(json);
        debug!(cards = shape.card_count(), "saved deck shape");
        Ok(())
    }

    fn load_deck(&self) -> StorageResult<DeckShape> {
        let record = self.deck.read().expect("deck record lock poisoned");
        let raw = record
            .as_deref()
            .ok_or_else(|| StorageError::NotFound("deck shape".into()))?;
        DeckShape::from_json(raw)
    }

    fn delete_deck(&self) -> StorageResult<()> {
        *self.deck.write().expect("deck record lock poisoned") = None;
        Ok(())
    }
}

#![forbid(unsafe_code)]

//! Session restore boundary.
//!
//! The deck core exposes persistence as fallible calls and never catches
//! storage errors itself; this module is the boundary that does. A deck
//! that fails to load - missing, corrupt, or referencing stacks that are
//! gone - is replaced by a freshly built single-card deck showing the
//! caller's landing page, and the bad store is wiped so the next session
//! starts clean. The end user only ever notices that they landed on a
//! default view instead of their previous session.

use tracing::{info, warn};

use crate::card::CardHandle;
use pagedeck_core::page::Page;
use pagedeck_core::{Deck, DeckNode, PageStack, SavedPageState};
use pagedeck_store::{
    DeckRepository, DeckShape, PageStackRepository, StackCell, StorageError, StorageResult,
};

/// Project a deck value onto its persistable tree shape.
///
/// Card contents are referenced by stack identity; the stacks themselves
/// are persisted separately when created.
pub fn deck_to_shape<P: Page>(deck: &Deck<CardHandle<P>>) -> DeckShape {
    DeckShape::Row {
        children: deck.top_level().iter().map(node_to_shape).collect(),
    }
}

fn node_to_shape<P: Page>(node: &DeckNode<CardHandle<P>>) -> DeckShape {
    match node {
        DeckNode::Card(card) => DeckShape::Card { stack: card.id() },
        DeckNode::Row(children) => DeckShape::Row {
            children: children.iter().map(node_to_shape).collect(),
        },
        DeckNode::Column(children) => DeckShape::Column {
            children: children.iter().map(node_to_shape).collect(),
        },
    }
}

/// Rebuild a deck value from its persisted shape, resolving every card's
/// stack reference through the repository.
pub fn deck_from_shape<P, R>(shape: &DeckShape, stacks: &R) -> StorageResult<Deck<CardHandle<P>>>
where
    P: Page,
    R: PageStackRepository<P> + ?Sized,
{
    let DeckShape::Row { children } = shape else {
        return Err(StorageError::Corruption(
            "deck shape root is not a row".into(),
        ));
    };
    let nodes = children
        .iter()
        .map(|child| node_from_shape(child, stacks))
        .collect::<StorageResult<Vec<_>>>()?;
    Ok(Deck::new(nodes))
}

fn node_from_shape<P, R>(shape: &DeckShape, stacks: &R) -> StorageResult<DeckNode<CardHandle<P>>>
where
    P: Page,
    R: PageStackRepository<P> + ?Sized,
{
    match shape {
        DeckShape::Card { stack } => Ok(DeckNode::Card(CardHandle::new(
            stacks.load_stack(*stack)?,
        ))),
        DeckShape::Row { children } => Ok(DeckNode::Row(std::sync::Arc::new(
            children
                .iter()
                .map(|child| node_from_shape(child, stacks))
                .collect::<StorageResult<Vec<_>>>()?,
        ))),
        DeckShape::Column { children } => Ok(DeckNode::Column(std::sync::Arc::new(
            children
                .iter()
                .map(|child| node_from_shape(child, stacks))
                .collect::<StorageResult<Vec<_>>>()?,
        ))),
    }
}

/// Load the persisted deck, falling back to a fresh single-card deck
/// showing `landing` when anything about the saved session is unusable.
///
/// On fallback the stale deck record and stacks are deleted so the
/// corruption does not resurface next session.
pub fn load_deck_or_default<P, R>(
    store: &R,
    landing: impl FnOnce() -> SavedPageState<P>,
) -> Deck<CardHandle<P>>
where
    P: Page,
    R: DeckRepository + PageStackRepository<P>,
{
    match store
        .load_deck()
        .and_then(|shape| deck_from_shape(&shape, store))
    {
        Ok(deck) if !deck.is_empty() => {
            info!(cards = deck.card_count(), "restored page deck");
            deck
        }
        Ok(_) => {
            info!("restored deck was empty; starting fresh");
            fresh_deck(store, landing)
        }
        Err(error) => {
            warn!(error = %error, "failed to restore page deck; starting fresh");
            if let Err(error) = store.delete_deck() {
                warn!(error = %error, "failed to clear stale deck record");
            }
            if let Err(error) = store.delete_all_stacks() {
                warn!(error = %error, "failed to clear stale page stacks");
            }
            fresh_deck(store, landing)
        }
    }
}

fn fresh_deck<P, R>(store: &R, landing: impl FnOnce() -> SavedPageState<P>) -> Deck<CardHandle<P>>
where
    P: Page,
    R: PageStackRepository<P>,
{
    let stack = PageStack::single(landing());
    let cell = match store.save_stack(&stack) {
        Ok(cell) => cell,
        Err(error) => {
            warn!(error = %error, "failed to persist landing stack; keeping it in memory");
            StackCell::new(stack)
        }
    };
    Deck::from_cards([CardHandle::new(cell)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedeck_core::{PageId, PageKind, PageStackId};
    use pagedeck_store::MemoryStore;

    #[derive(Debug, Clone, PartialEq)]
    enum TestPage {
        Landing,
        Note(u64),
    }

    impl Page for TestPage {
        fn kind(&self) -> PageKind {
            match self {
                TestPage::Landing => "landing",
                TestPage::Note(_) => "note",
            }
        }
    }

    fn note(id: u64) -> SavedPageState<TestPage> {
        SavedPageState::new(PageId::from_raw(id), TestPage::Note(id))
    }

    fn saved_card(store: &MemoryStore<TestPage>, id: u64) -> CardHandle<TestPage> {
        let stack = PageStack::single(note(id));
        CardHandle::new(store.save_stack(&stack).unwrap())
    }

    #[test]
    fn shape_round_trips_nested_decks() {
        let store: MemoryStore<TestPage> = MemoryStore::new();
        let a = saved_card(&store, 1);
        let b = saved_card(&store, 2);
        let c = saved_card(&store, 3);
        let deck = Deck::new(vec![
            DeckNode::column(vec![DeckNode::Card(a), DeckNode::Card(b)]),
            DeckNode::Card(c),
        ]);

        let shape = deck_to_shape(&deck);
        store.save_deck(&shape).unwrap();

        let restored = deck_from_shape(&store.load_deck().unwrap(), &store).unwrap();
        assert_eq!(restored, deck);
        assert_eq!(restored.top_level().len(), 2);
    }

    #[test]
    fn restored_cards_share_the_saved_cells() {
        let store: MemoryStore<TestPage> = MemoryStore::new();
        let card = saved_card(&store, 1);
        let deck = Deck::from_cards([card.clone()]);
        store.save_deck(&deck_to_shape(&deck)).unwrap();

        let restored = deck_from_shape(&store.load_deck().unwrap(), &store).unwrap();
        let twin = restored.get(0).unwrap();
        card.stack_cell().set(card.stack().pushed(note(2)));
        assert_eq!(twin.stack().len(), 2);
    }

    #[test]
    fn missing_deck_falls_back_to_landing() {
        let store: MemoryStore<TestPage> = MemoryStore::new();
        let deck = load_deck_or_default(&store, || {
            SavedPageState::new(PageId::next(), TestPage::Landing)
        });
        assert_eq!(deck.card_count(), 1);
        assert_eq!(deck.get(0).unwrap().stack().head().page, TestPage::Landing);
    }

    #[test]
    fn corrupt_deck_is_wiped_and_replaced() {
        let store: MemoryStore<TestPage> = MemoryStore::new();
        saved_card(&store, 1);
        store.set_raw_deck("deck shape? never heard of it");

        let deck = load_deck_or_default(&store, || {
            SavedPageState::new(PageId::next(), TestPage::Landing)
        });
        assert_eq!(deck.card_count(), 1);
        assert_eq!(deck.get(0).unwrap().stack().head().page, TestPage::Landing);
        // Stale stacks are gone; only the fresh landing stack remains.
        assert_eq!(store.stack_count(), 1);
    }

    #[test]
    fn dangling_stack_reference_counts_as_failure() {
        let store: MemoryStore<TestPage> = MemoryStore::new();
        store
            .save_deck(&DeckShape::Row {
                children: vec![DeckShape::Card {
                    stack: PageStackId::from_raw(424_242),
                }],
            })
            .unwrap();

        let deck = load_deck_or_default(&store, || {
            SavedPageState::new(PageId::next(), TestPage::Landing)
        });
        assert_eq!(deck.get(0).unwrap().stack().head().page, TestPage::Landing);
    }
}

//! Property-based invariant tests for the deck tree.
//!
//! These tests verify structural invariants that must hold for any deck
//! shape and any valid index:
//!
//! 1. Card count equals the sum of top-level child counts.
//! 2. Card count equals the length of the flattened traversal.
//! 3. Insert then remove at the same index round-trips structurally.
//! 4. Mutators never touch the receiver.
//! 5. Insertion grows the count by the inserted subtree's count.
//! 6. Removal shrinks the count by one.
//! 7. Top-level boundaries are monotone and bounded by the card count.

use pagedeck_core::deck::{Deck, DeckNode};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn node_strategy() -> impl Strategy<Value = DeckNode<u32>> {
    let leaf = any::<u32>().prop_map(DeckNode::Card);
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(DeckNode::row),
            prop::collection::vec(inner, 1..4).prop_map(DeckNode::column),
        ]
    })
}

fn deck_strategy() -> impl Strategy<Value = Deck<u32>> {
    prop::collection::vec(node_strategy(), 0..5).prop_map(Deck::new)
}

fn nonempty_deck_strategy() -> impl Strategy<Value = Deck<u32>> {
    prop::collection::vec(node_strategy(), 1..5).prop_map(Deck::new)
}

proptest! {
    #[test]
    fn count_matches_top_level_sum(deck in deck_strategy()) {
        let sum: usize = deck.top_level().iter().map(DeckNode::card_count).sum();
        prop_assert_eq!(deck.card_count(), sum);
    }

    #[test]
    fn count_matches_traversal_length(deck in deck_strategy()) {
        prop_assert_eq!(deck.card_count(), deck.cards().count());
    }

    #[test]
    fn insert_remove_round_trips(deck in deck_strategy(), card in any::<u32>(), pick in any::<prop::sample::Index>()) {
        let index = pick.index(deck.card_count() + 1);
        let edited = deck.inserted(index, DeckNode::Card(card));
        prop_assert_eq!(edited.removed(index), deck);
    }

    #[test]
    fn mutators_leave_receiver_untouched(deck in nonempty_deck_strategy(), pick in any::<prop::sample::Index>()) {
        let before = deck.clone();
        let index = pick.index(deck.card_count());
        let _ = deck.inserted(index, DeckNode::Card(0));
        let _ = deck.removed(index);
        let _ = deck.replaced(index, DeckNode::Card(0));
        prop_assert_eq!(deck, before);
    }

    #[test]
    fn insertion_grows_count_by_subtree(deck in deck_strategy(), sub in node_strategy(), pick in any::<prop::sample::Index>()) {
        let index = pick.index(deck.card_count() + 1);
        let grown = deck.inserted(index, sub.clone());
        prop_assert_eq!(grown.card_count(), deck.card_count() + sub.card_count());
    }

    #[test]
    fn removal_shrinks_count_by_one(deck in nonempty_deck_strategy(), pick in any::<prop::sample::Index>()) {
        let index = pick.index(deck.card_count());
        prop_assert_eq!(deck.removed(index).card_count(), deck.card_count() - 1);
    }

    #[test]
    fn boundaries_are_monotone_and_bounded(deck in nonempty_deck_strategy()) {
        let count = deck.card_count();
        let mut prev = 0;
        for i in 0..count {
            let boundary = deck.top_level_boundary_after(i);
            prop_assert!(boundary > i);
            prop_assert!(boundary <= count);
            prop_assert!(boundary >= prev);
            prev = boundary;
        }
    }
}

#![forbid(unsafe_code)]

//! The deck tree: a persistent arrangement of navigable cards.
//!
//! A [`Deck`] is a tree of [`DeckNode`]s. Leaves are cards (one card = one
//! independently navigable column backed by a page stack); interior nodes
//! group children horizontally ([`DeckNode::Row`]) or vertically
//! ([`DeckNode::Column`]). The root is always a row.
//!
//! Every other component addresses cards through the **flattened index**:
//! the position of a card in the depth-first, left-to-right traversal of
//! the tree. [`Deck::inserted`], [`Deck::removed`] and [`Deck::replaced`]
//! operate on that index space and return new decks; the receiver is never
//! modified. Group children sit behind [`Arc`], so an edit copies only the
//! spine from the root down to the touched node and shares everything else
//! with the previous tree.
//!
//! # Index-space invariants
//!
//! 1. `card_count == sum of child card counts over top-level children`
//! 2. `card_count == cards().count()`
//! 3. For any valid `i`: `deck.inserted(i, node).removed(i) == deck`

use std::sync::Arc;

/// One node in the deck tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckNode<T> {
    /// A leaf holding opaque per-card content.
    Card(T),
    /// Horizontal grouping of children.
    Row(Arc<Vec<DeckNode<T>>>),
    /// Vertical grouping of children.
    Column(Arc<Vec<DeckNode<T>>>),
}

impl<T> DeckNode<T> {
    /// Build a row node from children.
    pub fn row(children: Vec<DeckNode<T>>) -> Self {
        Self::Row(Arc::new(children))
    }

    /// Build a column node from children.
    pub fn column(children: Vec<DeckNode<T>>) -> Self {
        Self::Column(Arc::new(children))
    }

    /// Number of card leaves under this node.
    pub fn card_count(&self) -> usize {
        match self {
            Self::Card(_) => 1,
            Self::Row(children) | Self::Column(children) => {
                children.iter().map(DeckNode::card_count).sum()
            }
        }
    }
}

/// A persistent tree of cards. The root is a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck<T> {
    root: Arc<Vec<DeckNode<T>>>,
}

impl<T> Default for Deck<T> {
    fn default() -> Self {
        Self {
            root: Arc::new(Vec::new()),
        }
    }
}

impl<T> Deck<T> {
    /// Create a deck from the root row's children.
    pub fn new(children: Vec<DeckNode<T>>) -> Self {
        Self {
            root: Arc::new(children),
        }
    }

    /// Create a flat deck with one top-level card per payload.
    pub fn from_cards(cards: impl IntoIterator<Item = T>) -> Self {
        Self::new(cards.into_iter().map(DeckNode::Card).collect())
    }

    /// The root row's children.
    pub fn top_level(&self) -> &[DeckNode<T>] {
        &self.root
    }

    /// Total number of cards in the deck.
    pub fn card_count(&self) -> usize {
        self.root.iter().map(DeckNode::card_count).sum()
    }

    /// True when the deck holds no cards.
    pub fn is_empty(&self) -> bool {
        self.card_count() == 0
    }

    /// The card at `index` in the flattened sequence, if in range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.cards().nth(index)
    }

    /// Lazy depth-first, left-to-right traversal of all card payloads.
    ///
    /// The order of this sequence defines the flattened index space used by
    /// scrolling, the active-card index, and navigation.
    pub fn cards(&self) -> Cards<'_, T> {
        Cards {
            stack: vec![self.root.iter()],
        }
    }

    /// Flat index of the first card matching `pred`, if any.
    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.cards().position(|card| pred(card))
    }

    /// Flat index one past the top-level subtree containing the card at
    /// `index`.
    ///
    /// This is the boundary at which "insert a sibling after this card"
    /// splices, even when the card lives inside a nested group: the walk
    /// sums top-level child counts until the running total exceeds `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range.
    pub fn top_level_boundary_after(&self, index: usize) -> usize {
        let count = self.card_count();
        assert!(
            index < count,
            "card index {index} out of range (deck holds {count} cards)"
        );
        let mut total = 0;
        for child in self.root.iter() {
            total += child.card_count();
            if total > index {
                return total;
            }
        }
        // The assert above guarantees some subtree contains the index.
        unreachable!("card index {index} not covered by top-level children")
    }
}

impl<T: Clone> Deck<T> {
    /// Return a new deck with `node` inserted so its first card lands at
    /// flat index `index`. The receiver is untouched.
    ///
    /// An index that falls exactly on a boundary between two top-level
    /// subtrees splices at the root (the shallowest position); an index
    /// interior to a group descends into that group.
    ///
    /// # Panics
    ///
    /// Panics when `index > card_count`.
    pub fn inserted(&self, index: usize, node: DeckNode<T>) -> Self {
        let count = self.card_count();
        assert!(
            index <= count,
            "insertion index {index} out of range (deck holds {count} cards)"
        );
        Self {
            root: Arc::new(insert_into(&self.root, index, node)),
        }
    }

    /// Return a new deck with the card at flat index `index` removed.
    /// A group left empty by the removal is pruned.
    ///
    /// # Panics
    ///
    /// Panics when `index >= card_count`.
    pub fn removed(&self, index: usize) -> Self {
        let count = self.card_count();
        assert!(
            index < count,
            "removal index {index} out of range (deck holds {count} cards)"
        );
        Self {
            root: Arc::new(remove_from(&self.root, index)),
        }
    }

    /// Return a new deck with the card at flat index `index` replaced by
    /// `node` (which may be a whole subtree).
    ///
    /// # Panics
    ///
    /// Panics when `index >= card_count`.
    pub fn replaced(&self, index: usize, node: DeckNode<T>) -> Self {
        let count = self.card_count();
        assert!(
            index < count,
            "replacement index {index} out of range (deck holds {count} cards)"
        );
        Self {
            root: Arc::new(replace_in(&self.root, index, node)),
        }
    }
}

fn insert_into<T: Clone>(
    nodes: &[DeckNode<T>],
    mut index: usize,
    node: DeckNode<T>,
) -> Vec<DeckNode<T>> {
    let mut out = Vec::with_capacity(nodes.len() + 1);
    let mut pending = Some(node);
    for child in nodes {
        if let Some(node) = pending.take() {
            if index == 0 {
                out.push(node);
            } else {
                let count = child.card_count();
                if index < count {
                    out.push(splice_group(child, index, node));
                    continue;
                }
                index -= count;
                pending = Some(node);
            }
        }
        out.push(child.clone());
    }
    if let Some(node) = pending {
        out.push(node);
    }
    out
}

fn splice_group<T: Clone>(group: &DeckNode<T>, index: usize, node: DeckNode<T>) -> DeckNode<T> {
    match group {
        // Only groups have interior indices: a card's count is 1, so a
        // strictly interior index can never address a leaf.
        DeckNode::Card(_) => unreachable!("interior insertion index on a card leaf"),
        DeckNode::Row(children) => DeckNode::Row(Arc::new(insert_into(children, index, node))),
        DeckNode::Column(children) => {
            DeckNode::Column(Arc::new(insert_into(children, index, node)))
        }
    }
}

fn remove_from<T: Clone>(nodes: &[DeckNode<T>], mut index: usize) -> Vec<DeckNode<T>> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut removed = false;
    for child in nodes {
        if !removed {
            let count = child.card_count();
            if index < count {
                removed = true;
                match child {
                    DeckNode::Card(_) => {}
                    DeckNode::Row(children) => {
                        let rest = remove_from(children, index);
                        if !rest.is_empty() {
                            out.push(DeckNode::Row(Arc::new(rest)));
                        }
                    }
                    DeckNode::Column(children) => {
                        let rest = remove_from(children, index);
                        if !rest.is_empty() {
                            out.push(DeckNode::Column(Arc::new(rest)));
                        }
                    }
                }
                continue;
            }
            index -= count;
        }
        out.push(child.clone());
    }
    out
}

fn replace_in<T: Clone>(
    nodes: &[DeckNode<T>],
    mut index: usize,
    node: DeckNode<T>,
) -> Vec<DeckNode<T>> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut pending = Some(node);
    for child in nodes {
        if let Some(node) = pending.take() {
            let count = child.card_count();
            if index < count {
                match child {
                    DeckNode::Card(_) => out.push(node),
                    DeckNode::Row(children) => {
                        out.push(DeckNode::Row(Arc::new(replace_in(children, index, node))));
                    }
                    DeckNode::Column(children) => {
                        out.push(DeckNode::Column(Arc::new(replace_in(
                            children, index, node,
                        ))));
                    }
                }
                continue;
            }
            index -= count;
            pending = Some(node);
        }
        out.push(child.clone());
    }
    out
}

/// Iterator over card payloads in flattened order. See [`Deck::cards`].
pub struct Cards<'a, T> {
    stack: Vec<std::slice::Iter<'a, DeckNode<T>>>,
}

impl<'a, T> Iterator for Cards<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(DeckNode::Card(card)) => return Some(card),
                Some(DeckNode::Row(children)) | Some(DeckNode::Column(children)) => {
                    self.stack.push(children.iter());
                }
            }
        }
    }
}

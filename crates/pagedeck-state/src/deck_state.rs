#![forbid(unsafe_code)]

//! The deck orchestrator.
//!
//! [`DeckState`] owns the current [`Deck`] value behind a single mutable
//! cell: every structural mutation replaces the whole tree with a new
//! persistent value, never a node in place. It binds the tree to a
//! [`LayoutStrategy`], a [`ScrollState`], the lazy [`CardRegistry`], the
//! [`TransitionCoordinator`] and the page-stack repository, and exposes
//! the mutation API the UI shell drives.
//!
//! # Driving the state
//!
//! The host event loop owns time and measurement:
//!
//! - call [`DeckState::layout`] whenever the viewport is (re)measured -
//!   this is the signal animated insertions wait on
//! - call [`DeckState::tick`] once per animation frame
//!
//! Until [`DeckState::bind_animations`] is called (i.e. during initial
//! synchronous setup, before the UI has attached), every mutation applies
//! immediately with no transition.
//!
//! # Active card
//!
//! The active index is corrected after every event that can move the
//! visible range - mutation, layout, drag movement, scroll settle - by
//! re-deriving it through the strategy. The correction is skipped only
//! while an animated scroll is in flight; the settle tick re-runs it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::card::CardHandle;
use crate::content::PageRegistry;
use crate::coordinator::{CardEffect, RemovalMode, TransitionCoordinator};
use crate::registry::{CardRegistry, CardRuntime};
use pagedeck_core::geometry::Size;
use pagedeck_core::{Deck, DeckNode, PageStack, PageStackId, SavedPageState};
use pagedeck_core::page::Page;
use pagedeck_layout::{
    LayoutPass, LayoutStrategy, MultiColumnLayout, PositionIntent, ScrollState,
    SingleColumnLayout,
};
use pagedeck_store::{DeckRepository, PageStackRepository, StorageResult};

/// Orchestrator for one deck surface.
///
/// Generic over the layout strategy; see [`SingleColumnDeckState`] and
/// [`MultiColumnDeckState`] for the two shipped shapes.
pub struct DeckState<P: Page, S: LayoutStrategy> {
    strategy: S,
    deck: Deck<CardHandle<P>>,
    scroll: ScrollState,
    pass: LayoutPass,
    viewport: Size,
    active_index: usize,
    cards: CardRegistry,
    pages: Arc<PageRegistry<P>>,
    stacks: Arc<dyn PageStackRepository<P>>,
    transitions: TransitionCoordinator,
    animated: bool,
}

/// One card fills the viewport; phone-style navigation.
pub type SingleColumnDeckState<P> = DeckState<P, SingleColumnLayout>;

/// Several cards side by side; desktop/tablet-style navigation.
pub type MultiColumnDeckState<P> = DeckState<P, MultiColumnLayout>;

impl<P: Page, S: LayoutStrategy> DeckState<P, S> {
    /// Create an orchestrator over an existing deck value (typically the
    /// result of session restore). Starts with animations unbound and a
    /// zero viewport; the first [`DeckState::layout`] call supplies real
    /// constraints.
    pub fn new(
        strategy: S,
        deck: Deck<CardHandle<P>>,
        pages: Arc<PageRegistry<P>>,
        stacks: Arc<dyn PageStackRepository<P>>,
    ) -> Self {
        let mut transitions = TransitionCoordinator::new();
        for card in deck.cards() {
            transitions.track_shown(card.id());
        }
        let mut state = Self {
            strategy,
            deck,
            scroll: ScrollState::new(),
            pass: LayoutPass::default(),
            viewport: Size::ZERO,
            active_index: 0,
            cards: CardRegistry::new(),
            pages,
            stacks,
            transitions,
            animated: false,
        };
        state.recompute_layout();
        state
    }

    /// Attach the animation scope. From here on insertions and removals
    /// run their transitions instead of applying instantly.
    pub fn bind_animations(&mut self) {
        self.animated = true;
        info!("deck animation scope bound");
    }

    /// Whether the animation scope is bound.
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    // -- Accessors ----------------------------------------------------------

    /// The current deck value.
    pub fn deck(&self) -> &Deck<CardHandle<P>> {
        &self.deck
    }

    /// Number of cards in the deck.
    pub fn card_count(&self) -> usize {
        self.deck.card_count()
    }

    /// Flattened index of the active card.
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Current scroll offset. Mid-animation this is the animated value,
    /// not the target.
    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    /// The most recent layout pass.
    pub fn layout_pass(&self) -> &LayoutPass {
        &self.pass
    }

    /// Opacity of the card at `index` (insertion/removal fades).
    pub fn card_alpha(&self, index: usize) -> Option<f32> {
        self.pass.metrics(index).map(|m| m.alpha)
    }

    /// Transition slide displacement of the card at `index`.
    pub fn card_slide(&self, index: usize) -> Option<f32> {
        self.deck
            .get(index)
            .map(|card| self.transitions.slide_offset(card.id()))
    }

    /// Flattened index of the card with the given identity.
    pub fn index_of(&self, id: PageStackId) -> Option<usize> {
        self.deck.position(|card| card.id() == id)
    }

    fn card_by_id(&self, id: PageStackId) -> Option<CardHandle<P>> {
        self.deck.cards().find(|card| card.id() == id).cloned()
    }

    // -- Host signals -------------------------------------------------------

    /// Feed a measured layout pass for the given viewport.
    ///
    /// Recomputes every card's geometry, updates the scroll bounds, lets
    /// pending insertions observe that they are now measured, and
    /// re-clamps the active index.
    pub fn layout(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.recompute_layout();
        let deck = self.deck.clone();
        let effects = self
            .transitions
            .on_layout_pass(|id| deck.position(|card| card.id() == id).is_some());
        self.apply_effects(effects);
        self.clamp_active();
    }

    /// Advance animations by `dt`: scroll, highlights, transitions.
    pub fn tick(&mut self, dt: Duration) {
        let settled = self.scroll.tick(dt);
        self.cards.tick(dt);
        let effects = self.transitions.tick(dt);
        self.apply_effects(effects);
        self.sync_alphas();
        if settled {
            debug!(offset = self.scroll.offset(), "scroll settled");
            self.clamp_active();
        }
    }

    fn recompute_layout(&mut self) {
        let pass = self.strategy.layout(self.viewport, self.deck.card_count());
        self.scroll.set_max_offset(pass.max_scroll_offset());
        self.pass = pass;
        self.sync_alphas();
    }

    fn sync_alphas(&mut self) {
        let Self {
            deck,
            pass,
            transitions,
            ..
        } = self;
        for (index, card) in deck.cards().enumerate() {
            if let Some(metrics) = pass.metrics_mut(index) {
                metrics.alpha = transitions.alpha(card.id());
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<CardEffect>) {
        for effect in effects {
            match effect {
                CardEffect::ScrollIntoView(id) => {
                    if let Some(index) = self.index_of(id) {
                        self.active_index = index;
                        let target = self.strategy.scroll_offset(
                            &self.pass,
                            index,
                            PositionIntent::NearestVisible,
                            self.scroll.offset(),
                        );
                        self.scroll.animate_to(target);
                        trace!(id = %id, index, target, "scrolling inserted card into view");
                    }
                }
                CardEffect::Reveal(id) => {
                    if let Some(card) = self.card_by_id(id) {
                        card.set_visible(true);
                        trace!(id = %id, "card revealed");
                    }
                }
                CardEffect::Remove(id) => self.remove_now(id),
            }
        }
    }

    fn clamp_active(&mut self) {
        if self.scroll.is_animating() {
            return;
        }
        match self
            .strategy
            .active_index(&self.pass, self.scroll.offset(), self.active_index)
        {
            Some(active) => {
                if active != self.active_index {
                    trace!(from = self.active_index, to = active, "active card corrected");
                    self.active_index = active;
                }
            }
            None => self.active_index = 0,
        }
    }

    // -- Mutations ----------------------------------------------------------

    /// Open `page` as a brand-new single-page card immediately after the
    /// active card. Returns the new card's identity.
    pub fn add_card(&mut self, page: SavedPageState<P>) -> StorageResult<PageStackId> {
        let index = if self.deck.is_empty() {
            0
        } else {
            (self.active_index + 1).min(self.deck.card_count())
        };
        self.add_card_at(index, PageStack::single(page))
    }

    /// Persist `stack` and splice it into the deck at flat index `index`.
    ///
    /// With the animation scope unbound the card appears immediately and
    /// becomes active. With it bound, the card enters hidden and the
    /// insert sequence (measure, scroll into view, settle, reveal) runs
    /// across the following [`DeckState::layout`]/[`DeckState::tick`]
    /// calls.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range.
    pub fn add_card_at(
        &mut self,
        index: usize,
        stack: PageStack<P>,
    ) -> StorageResult<PageStackId> {
        let count = self.deck.card_count();
        assert!(
            index <= count,
            "insertion index {index} out of range (deck holds {count} cards)"
        );
        let id = stack.id();
        let cell = self.stacks.save_stack(&stack)?;
        let handle = if self.animated {
            CardHandle::hidden(cell)
        } else {
            CardHandle::new(cell)
        };
        self.deck = self.deck.inserted(index, DeckNode::Card(handle));
        if self.animated {
            self.transitions.track_hidden(id);
        } else {
            self.transitions.track_shown(id);
        }
        info!(id = %id, index, animated = self.animated, "card inserted");
        self.recompute_layout();
        if !self.animated {
            self.active_index = index;
            let target = self.strategy.scroll_offset(
                &self.pass,
                index,
                PositionIntent::NearestVisible,
                self.scroll.offset(),
            );
            self.scroll.jump_to(target);
        }
        self.clamp_active();
        Ok(id)
    }

    /// Remove the card with the given identity.
    ///
    /// With the animation scope bound, a visible card plays its exit
    /// transition first and is removed once it elapses; a card still
    /// hidden mid-insertion is torn down immediately. Unknown identities
    /// are a silent no-op (closing twice is an expected race, not an
    /// error).
    pub fn remove_card(&mut self, id: PageStackId) {
        if self.index_of(id).is_none() {
            debug!(id = %id, "remove ignored: card not in deck");
            return;
        }
        if !self.animated {
            self.remove_now(id);
            return;
        }
        match self.transitions.begin_removal(id) {
            RemovalMode::Immediate => self.remove_now(id),
            RemovalMode::Deferred => {
                if let Some(card) = self.card_by_id(id) {
                    card.set_visible(false);
                }
                self.sync_alphas();
                debug!(id = %id, "card exit transition started");
            }
        }
    }

    fn remove_now(&mut self, id: PageStackId) {
        self.transitions.forget(id);
        self.cards.remove(id);
        let Some(index) = self.index_of(id) else {
            return;
        };
        self.deck = self.deck.removed(index);
        info!(id = %id, index, remaining = self.deck.card_count(), "card removed");
        self.recompute_layout();
        self.clamp_active();
    }

    /// Make the card at `index` active: scroll it into reach per the
    /// layout strategy and, when `animate` is set, pulse its highlight -
    /// but only if its heavyweight state was already materialized; an
    /// offscreen card is never woken just to animate.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range.
    pub fn activate(&mut self, index: usize, animate: bool) {
        let count = self.deck.card_count();
        assert!(
            index < count,
            "activation index {index} out of range (deck holds {count} cards)"
        );
        let target = self.strategy.scroll_offset(
            &self.pass,
            index,
            PositionIntent::NearestVisible,
            self.scroll.offset(),
        );
        if self.animated {
            self.scroll.animate_to(target);
        } else {
            self.scroll.jump_to(target);
        }
        self.active_index = index;
        if animate
            && let Some(card) = self.deck.get(index)
            && let Some(runtime) = self.cards.peek_mut(card.id())
        {
            runtime.start_highlight();
        }
        debug!(index, animate, "card activated");
    }

    /// Animate the scroll so the card at `index` satisfies `intent`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range; scrolling to a nonexistent
    /// card is a programmer error.
    pub fn animate_scroll(&mut self, index: usize, intent: PositionIntent) {
        let target =
            self.strategy
                .scroll_offset(&self.pass, index, intent, self.scroll.offset());
        if self.animated {
            self.scroll.animate_to(target);
        } else {
            self.scroll.jump_to(target);
            self.clamp_active();
        }
    }

    // -- Pointer gestures ---------------------------------------------------

    /// Begin a drag gesture, interrupting any animated scroll.
    pub fn begin_drag(&mut self) {
        self.scroll.begin_drag();
    }

    /// Apply a drag delta in offset units (positive reveals rightward
    /// content). Out-of-range movement rubber-bands.
    pub fn drag_by(&mut self, delta: f32) {
        self.scroll.drag_by(delta);
        self.clamp_active();
    }

    /// Release the drag with a residual velocity. The scroll settles on a
    /// card boundary chosen by the strategy (nearest, or further in the
    /// direction of travel for a fast fling), snapping back from any
    /// overscroll.
    pub fn end_drag(&mut self, velocity: f32) {
        self.scroll.end_drag();
        let target = self
            .strategy
            .snap_target(&self.pass, self.scroll.offset(), velocity);
        debug!(velocity, target, "drag released");
        if self.animated {
            self.scroll.animate_to(target);
        } else {
            self.scroll.jump_to(target);
            self.clamp_active();
        }
    }

    // -- Per-card page navigation -------------------------------------------

    /// Push a page onto a card's stack. No-op for unknown cards.
    pub fn start_page(&mut self, card: PageStackId, page: SavedPageState<P>) {
        let Some(handle) = self.card_by_id(card) else {
            debug!(id = %card, "start ignored: card not in deck");
            return;
        };
        let stack = handle.stack().pushed(page);
        handle.stack_cell().set(stack.clone());
        if let Some(runtime) = self.cards.peek_mut(card) {
            runtime.sync_pages(&stack, &self.pages);
        }
        debug!(id = %card, depth = stack.len(), "page started");
    }

    /// Pop a card's top page. Popping the last page removes the whole
    /// card from the deck - there is no empty card. No-op for unknown
    /// cards.
    pub fn finish_page(&mut self, card: PageStackId) {
        let Some(handle) = self.card_by_id(card) else {
            debug!(id = %card, "finish ignored: card not in deck");
            return;
        };
        match handle.stack().popped() {
            Some(stack) => {
                handle.stack_cell().set(stack.clone());
                if let Some(runtime) = self.cards.peek_mut(card) {
                    runtime.sync_pages(&stack, &self.pages);
                }
                debug!(id = %card, depth = stack.len(), "page finished");
            }
            None => {
                debug!(id = %card, "last page finished; removing card");
                self.remove_card(card);
            }
        }
    }

    /// Insert `stack` as a sibling immediately after the top-level group
    /// containing `card`.
    ///
    /// Cards nested inside row/column groups insert at the enclosing
    /// top-level boundary, not inside the inner group. Returns `None`
    /// (without inserting) when `card` is not in the deck.
    pub fn insert_sibling_after(
        &mut self,
        card: PageStackId,
        stack: PageStack<P>,
    ) -> StorageResult<Option<PageStackId>> {
        let Some(index) = self.index_of(card) else {
            debug!(id = %card, "sibling insert ignored: card not in deck");
            return Ok(None);
        };
        let boundary = self.deck.top_level_boundary_after(index);
        self.add_card_at(boundary, stack).map(Some)
    }

    // -- Card materialization -----------------------------------------------

    /// The heavyweight runtime for the card at `index`, building it on
    /// first access. Called by the renderer when the card first becomes
    /// visible.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range.
    pub fn materialize_card(&mut self, index: usize) -> &mut CardRuntime {
        let count = self.deck.card_count();
        let Some(handle) = self.deck.get(index).cloned() else {
            panic!("card index {index} out of range (deck holds {count} cards)")
        };
        self.cards.materialize(&handle, &self.pages)
    }

    /// Non-constructing runtime lookup by card identity.
    pub fn card_runtime(&self, id: PageStackId) -> Option<&CardRuntime> {
        self.cards.peek(id)
    }

    // -- Persistence --------------------------------------------------------

    /// Persist the deck's tree shape. Stack contents are already saved
    /// individually; the shape only references them by identity.
    pub fn save_to(&self, store: &dyn DeckRepository) -> StorageResult<()> {
        store.save_deck(&crate::restore::deck_to_shape(&self.deck))
    }
}

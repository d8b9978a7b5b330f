#![forbid(unsafe_code)]

//! Lazy per-card heavyweight state.
//!
//! Materializing a card is expensive (it builds content state for every
//! page in the card's stack), so it happens at most once per card
//! lifetime and only on first demand - typically when the renderer first
//! shows the card. Features that merely *decorate* a card, like the
//! activation highlight, use [`CardRegistry::peek_mut`] so an offscreen
//! card is never woken just to play an animation.

use std::any::Any;
use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::card::CardHandle;
use crate::content::PageRegistry;
use pagedeck_core::animation::{Animation, Fade, ease_in_out};
use pagedeck_core::{Page, PageId, PageStack, PageStackId};

/// Length of the activation highlight pulse.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(400);

/// Materialized heavyweight state for one card.
pub struct CardRuntime {
    id: PageStackId,
    page_states: HashMap<PageId, Box<dyn Any>>,
    highlight: Option<Fade>,
}

impl CardRuntime {
    fn new<P: Page>(handle: &CardHandle<P>, pages: &PageRegistry<P>) -> Self {
        let stack = handle.stack();
        let page_states = stack
            .iter()
            .map(|page| (page.id, pages.create_state(page)))
            .collect();
        Self {
            id: handle.id(),
            page_states,
            highlight: None,
        }
    }

    /// Identity of the owning card.
    pub fn id(&self) -> PageStackId {
        self.id
    }

    /// Content state for one page, if that page is in the card's stack.
    pub fn page_state(&self, page: PageId) -> Option<&dyn Any> {
        self.page_states.get(&page).map(Box::as_ref)
    }

    /// Mutable content state for one page.
    pub fn page_state_mut(&mut self, page: PageId) -> Option<&mut (dyn Any + 'static)> {
        self.page_states.get_mut(&page).map(Box::as_mut)
    }

    /// Number of pages with materialized content state.
    pub fn page_count(&self) -> usize {
        self.page_states.len()
    }

    /// Reconcile content states after a stack push/pop: states for pages
    /// no longer in the stack are dropped, missing ones are built.
    pub fn sync_pages<P: Page>(&mut self, stack: &PageStack<P>, pages: &PageRegistry<P>) {
        self.page_states
            .retain(|id, _| stack.iter().any(|page| page.id == *id));
        for page in stack.iter() {
            if !self.page_states.contains_key(&page.id) {
                self.page_states.insert(page.id, pages.create_state(page));
            }
        }
    }

    /// Restart the activation highlight pulse.
    pub fn start_highlight(&mut self) {
        self.highlight = Some(Fade::new(HIGHLIGHT_DURATION).easing(ease_in_out));
    }

    /// Current highlight intensity in [0, 1]; 0 when idle.
    pub fn highlight_intensity(&self) -> f32 {
        match &self.highlight {
            Some(fade) => 1.0 - fade.value(),
            None => 0.0,
        }
    }

    fn tick(&mut self, dt: Duration) {
        if let Some(fade) = &mut self.highlight {
            fade.tick(dt);
            if fade.is_complete() {
                self.highlight = None;
            }
        }
    }
}

/// Registry of materialized card runtimes, keyed by card identity.
#[derive(Default)]
pub struct CardRegistry {
    runtimes: HashMap<PageStackId, CardRuntime>,
}

impl CardRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materialized cards.
    pub fn len(&self) -> usize {
        self.runtimes.len()
    }

    /// Whether no card has been materialized yet.
    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty()
    }

    /// Whether the card's runtime has been built.
    pub fn contains(&self, id: PageStackId) -> bool {
        self.runtimes.contains_key(&id)
    }

    /// The card's runtime, building it on first access and memoizing it
    /// for the rest of the card's lifetime.
    pub fn materialize<P: Page>(
        &mut self,
        handle: &CardHandle<P>,
        pages: &PageRegistry<P>,
    ) -> &mut CardRuntime {
        self.runtimes.entry(handle.id()).or_insert_with(|| {
            debug!(id = %handle.id(), "materializing card state");
            CardRuntime::new(handle, pages)
        })
    }

    /// Non-constructing lookup: `None` for cards never materialized.
    pub fn peek(&self, id: PageStackId) -> Option<&CardRuntime> {
        self.runtimes.get(&id)
    }

    /// Non-constructing mutable lookup.
    pub fn peek_mut(&mut self, id: PageStackId) -> Option<&mut CardRuntime> {
        self.runtimes.get_mut(&id)
    }

    /// Drop the runtime for a removed card.
    pub fn remove(&mut self, id: PageStackId) {
        self.runtimes.remove(&id);
    }

    /// Advance highlight animations.
    pub fn tick(&mut self, dt: Duration) {
        for runtime in self.runtimes.values_mut() {
            runtime.tick(dt);
        }
    }
}

#![forbid(unsafe_code)]

//! Deck orchestration: card state, transitions, and the mutation API.
//!
//! This crate binds the deck tree, the scroll/layout controller and the
//! persistence contracts into one stateful surface:
//!
//! - [`DeckState`] - the orchestrator owning the deck value and exposing
//!   add/remove/activate/navigate plus the pointer-gesture surface
//! - [`CardRegistry`] / [`CardRuntime`] - lazy per-card heavyweight state
//! - [`PageRegistry`] - page-kind to state-factory lookup
//! - [`TransitionCoordinator`] - the insertion/removal animation machine
//! - [`restore`] - the session-restore boundary (corrupt store fallback)
//!
//! Everything is single-threaded and pull-driven: the host event loop
//! feeds `layout(viewport)` once per measured frame and `tick(dt)` once
//! per animation frame, and all in-flight sequences (insert reveal, exit
//! teardown, animated scroll) advance only inside those calls.

pub mod card;
pub mod content;
pub mod coordinator;
pub mod deck_state;
pub mod navigate;
pub mod registry;
pub mod restore;

pub use card::CardHandle;
pub use content::PageRegistry;
pub use coordinator::{
    CardEffect, ENTER_EXIT_DURATION, ENTER_SLIDE_DISTANCE, REVEAL_SETTLE_DELAY,
    TransitionCoordinator,
};
pub use deck_state::{DeckState, MultiColumnDeckState, SingleColumnDeckState};
pub use registry::{CardRegistry, CardRuntime, HIGHLIGHT_DURATION};
pub use restore::{deck_from_shape, deck_to_shape, load_deck_or_default};

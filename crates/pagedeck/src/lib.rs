#![forbid(unsafe_code)]

//! PageDeck public facade crate.
//!
//! PageDeck is the layout and navigation engine behind a multi-column,
//! deck-style client: an arbitrarily nested arrangement of page stacks
//! (tab-like columns, each holding its own back-stack of pages) with
//! scrolling, snap physics, animated insertion/removal and
//! navigate-to-page-by-id. This crate re-exports the stable surface from
//! the internal crates and offers a lightweight prelude.

// --- Core re-exports -------------------------------------------------------

pub use pagedeck_core::animation::{Animation, Fade};
pub use pagedeck_core::geometry::{Point, Size};
pub use pagedeck_core::{Cards, Deck, DeckNode, Page, PageId, PageKind, PageStack, PageStackId, SavedPageState};

// --- Layout re-exports -----------------------------------------------------

pub use pagedeck_layout::{
    CardMetrics, LayoutPass, LayoutStrategy, MultiColumnLayout, PositionIntent, ScrollState,
    SingleColumnLayout,
};

// --- State re-exports ------------------------------------------------------

pub use pagedeck_state::{
    CardHandle, CardRegistry, CardRuntime, DeckState, MultiColumnDeckState, PageRegistry,
    SingleColumnDeckState, TransitionCoordinator, deck_from_shape, deck_to_shape,
    load_deck_or_default,
};

// --- Store re-exports ------------------------------------------------------

pub use pagedeck_store::{
    DeckRepository, DeckShape, MemoryStore, PageStackRepository, StackCell, StorageError,
    StorageResult,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CardHandle, Deck, DeckNode, DeckState, MultiColumnDeckState, MultiColumnLayout, Page,
        PageId, PageRegistry, PageStack, PageStackId, PositionIntent, SavedPageState,
        SingleColumnDeckState, SingleColumnLayout, Size, StorageResult,
    };

    pub use crate::{core, layout, state, store};
}

pub use pagedeck_core as core;
pub use pagedeck_layout as layout;
pub use pagedeck_state as state;
pub use pagedeck_store as store;

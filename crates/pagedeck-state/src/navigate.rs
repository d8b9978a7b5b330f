#![forbid(unsafe_code)]

//! Navigation by page identity.

use tracing::{debug, info};

use crate::deck_state::DeckState;
use pagedeck_core::page::Page;
use pagedeck_core::{PageId, SavedPageState};
use pagedeck_layout::LayoutStrategy;
use pagedeck_store::StorageResult;

impl<P: Page, S: LayoutStrategy> DeckState<P, S> {
    /// Bring the page with identity `target` on screen.
    ///
    /// Scans the flattened card sequence for a card whose **topmost** page
    /// matches and activates it. Pages buried deeper in some card's stack
    /// deliberately do not match: navigating to one opens a fresh card via
    /// `fallback` instead of surfacing the old card, so the user always
    /// lands on a top-level view. The fallback card is inserted
    /// immediately after the active card.
    pub fn navigate_to_page(
        &mut self,
        target: PageId,
        fallback: impl FnOnce() -> SavedPageState<P>,
    ) -> StorageResult<()> {
        if let Some(index) = self.deck().position(|card| card.top_page_id() == target) {
            debug!(%target, index, "navigation matched an existing card");
            self.activate(index, true);
            return Ok(());
        }
        let page = fallback();
        let id = self.add_card(page)?;
        info!(%target, id = %id, "navigation opened a new card");
        Ok(())
    }
}

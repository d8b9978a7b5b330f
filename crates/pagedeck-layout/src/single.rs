#![forbid(unsafe_code)]

//! Single-visible-column layout: one card fills the viewport.

use crate::{CardMetrics, DEFAULT_CARD_GUTTER, LayoutPass, LayoutStrategy, Size};

/// Layout strategy where exactly one card fills the viewport and cards sit
/// edge-to-edge with a fixed gutter between them.
///
/// The active card is derived geometrically: when the viewport straddles a
/// boundary between two cards, whichever card's midpoint is closer to the
/// viewport center wins, with ties going to the rightward card.
#[derive(Debug, Clone, Copy)]
pub struct SingleColumnLayout {
    gutter: f32,
}

impl Default for SingleColumnLayout {
    fn default() -> Self {
        Self {
            gutter: DEFAULT_CARD_GUTTER,
        }
    }
}

impl SingleColumnLayout {
    /// Create a layout with the default gutter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inter-card gutter.
    pub fn gutter(mut self, gutter: f32) -> Self {
        self.gutter = gutter.max(0.0);
        self
    }
}

impl LayoutStrategy for SingleColumnLayout {
    fn visible_columns(&self) -> usize {
        1
    }

    fn layout(&self, viewport: Size, card_count: usize) -> LayoutPass {
        #[cfg(feature = "tracing")]
        let _span =
            tracing::debug_span!("layout", strategy = "single_column", cards = card_count).entered();

        let width = viewport.width.max(0.0);
        let stride = (width + self.gutter).max(1.0);
        let metrics = (0..card_count)
            .map(|i| CardMetrics {
                x: i as f32 * stride,
                y: 0.0,
                width,
                alpha: 1.0,
            })
            .collect();
        let max_scroll = if card_count > 1 {
            stride * (card_count - 1) as f32
        } else {
            0.0
        };
        LayoutPass::new(viewport, stride, 0.0, max_scroll, metrics)
    }

    fn active_index(&self, pass: &LayoutPass, offset: f32, _current: usize) -> Option<usize> {
        let count = pass.card_count();
        if count == 0 {
            return None;
        }
        // Midpoint rule: a viewport centered exactly between two cards
        // rounds up, preferring the rightward card.
        let index = (offset / pass.stride() + 0.5).floor();
        Some((index.max(0.0) as usize).min(count - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FLING_MIN_VELOCITY, FLING_SKIP_STEP, PositionIntent};

    fn layout_of(n: usize) -> (SingleColumnLayout, LayoutPass) {
        let strategy = SingleColumnLayout::new().gutter(16.0);
        let pass = strategy.layout(Size::new(400.0, 600.0), n);
        (strategy, pass)
    }

    #[test]
    fn cards_fill_the_viewport() {
        let (_, pass) = layout_of(3);
        assert_eq!(pass.metrics(0).unwrap().width, 400.0);
        assert_eq!(pass.stride(), 416.0);
        assert_eq!(pass.metrics(2).unwrap().x, 832.0);
        assert_eq!(pass.max_scroll_offset(), 832.0);
    }

    #[test]
    fn first_and_last_visible_coincide_when_card_fills_viewport() {
        let (strategy, pass) = layout_of(3);
        let first = strategy.scroll_offset(&pass, 1, PositionIntent::FirstVisible, 0.0);
        let last = strategy.scroll_offset(&pass, 1, PositionIntent::LastVisible, 0.0);
        assert_eq!(first, 416.0);
        assert_eq!(first, last);
    }

    #[test]
    fn nearest_visible_moves_the_minimum_amount() {
        let (strategy, pass) = layout_of(3);
        let target = strategy.scroll_offset(&pass, 1, PositionIntent::NearestVisible, 0.0);
        assert_eq!(target, 416.0);
        // Already exactly in view: no movement.
        let target = strategy.scroll_offset(&pass, 1, PositionIntent::NearestVisible, 416.0);
        assert_eq!(target, 416.0);
    }

    #[test]
    fn active_index_follows_viewport_center() {
        let (strategy, pass) = layout_of(3);
        assert_eq!(strategy.active_index(&pass, 0.0, 0), Some(0));
        assert_eq!(strategy.active_index(&pass, 207.0, 0), Some(0));
        // Exactly at the midpoint between cards 0 and 1: rightward wins.
        assert_eq!(strategy.active_index(&pass, 208.0, 0), Some(1));
        assert_eq!(strategy.active_index(&pass, 416.0, 0), Some(1));
        // Past the end (overscroll) clamps to the last card.
        assert_eq!(strategy.active_index(&pass, 5000.0, 0), Some(2));
    }

    #[test]
    fn slow_release_snaps_to_nearest_boundary() {
        let (strategy, pass) = layout_of(4);
        assert_eq!(strategy.snap_target(&pass, 100.0, 0.0), 0.0);
        assert_eq!(strategy.snap_target(&pass, 300.0, 0.0), 416.0);
    }

    #[test]
    fn fling_moves_in_the_direction_of_travel() {
        let (strategy, pass) = layout_of(4);
        let v = FLING_MIN_VELOCITY + 1.0;
        // Barely past card 0, flung rightward: next boundary.
        assert_eq!(strategy.snap_target(&pass, 20.0, v), 416.0);
        // Mid-deck, flung leftward.
        assert_eq!(strategy.snap_target(&pass, 500.0, -v), 416.0);
        // From an exact boundary a fling still travels one card.
        assert_eq!(strategy.snap_target(&pass, 416.0, v), 832.0);
    }

    #[test]
    fn fast_fling_skips_cards() {
        let (strategy, pass) = layout_of(4);
        let v = FLING_MIN_VELOCITY + FLING_SKIP_STEP + 1.0;
        assert_eq!(strategy.snap_target(&pass, 20.0, v), 832.0);
        // Clamped at the deck's end.
        let v = FLING_MIN_VELOCITY + 10.0 * FLING_SKIP_STEP;
        assert_eq!(strategy.snap_target(&pass, 20.0, v), 1248.0);
    }

    #[test]
    #[should_panic(expected = "scroll target index 3 out of range")]
    fn scroll_offset_past_end_panics() {
        let (strategy, pass) = layout_of(3);
        let _ = strategy.scroll_offset(&pass, 3, PositionIntent::FirstVisible, 0.0);
    }

    #[test]
    fn empty_deck_has_no_active_card() {
        let (strategy, pass) = layout_of(0);
        assert_eq!(strategy.active_index(&pass, 0.0, 0), None);
        assert_eq!(pass.max_scroll_offset(), 0.0);
    }
}

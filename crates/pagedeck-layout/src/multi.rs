#![forbid(unsafe_code)]

//! Multi-column layout: N equal-width cards packed left-to-right.

use crate::{CardMetrics, DEFAULT_CARD_GUTTER, LayoutPass, LayoutStrategy, Size};

/// Layout strategy presenting `columns` cards at once, with gutters on both
/// outer edges and between cards.
///
/// Several cards are visible simultaneously, so "active" is not geometric:
/// the current active index is simply clamped into the visible range
/// whenever the range moves.
#[derive(Debug, Clone, Copy)]
pub struct MultiColumnLayout {
    columns: usize,
    gutter: f32,
}

impl MultiColumnLayout {
    /// Create a layout presenting `columns` cards at once.
    ///
    /// # Panics
    ///
    /// Panics when `columns` is zero.
    pub fn new(columns: usize) -> Self {
        assert!(columns >= 1, "multi-column layout requires at least one column");
        Self {
            columns,
            gutter: DEFAULT_CARD_GUTTER,
        }
    }

    /// Set the gutter used at the outer edges and between cards.
    pub fn gutter(mut self, gutter: f32) -> Self {
        self.gutter = gutter.max(0.0);
        self
    }

    /// Number of simultaneously presented cards.
    pub fn columns(&self) -> usize {
        self.columns
    }
}

impl LayoutStrategy for MultiColumnLayout {
    fn visible_columns(&self) -> usize {
        self.columns
    }

    fn layout(&self, viewport: Size, card_count: usize) -> LayoutPass {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "layout",
            strategy = "multi_column",
            columns = self.columns,
            cards = card_count
        )
        .entered();

        let n = self.columns as f32;
        let stride = ((viewport.width - self.gutter) / n).max(1.0);
        let width = ((viewport.width - 2.0 * self.gutter) / n - 2.0 * self.gutter).max(0.0);
        let metrics = (0..card_count)
            .map(|i| CardMetrics {
                x: self.gutter + i as f32 * stride,
                y: 0.0,
                width,
                alpha: 1.0,
            })
            .collect();
        let max_scroll = if card_count > self.columns {
            stride * (card_count - self.columns) as f32
        } else {
            0.0
        };
        LayoutPass::new(viewport, stride, self.gutter, max_scroll, metrics)
    }

    fn active_index(&self, pass: &LayoutPass, offset: f32, current: usize) -> Option<usize> {
        let count = pass.card_count();
        if count == 0 {
            return None;
        }
        let range = pass.visible_range(offset);
        if range.is_empty() {
            return Some(current.min(count - 1));
        }
        Some(current.clamp(range.start, range.end - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PositionIntent;

    const W: f32 = 800.0;
    const GUTTER: f32 = 16.0;

    fn layout_of(columns: usize, n: usize) -> (MultiColumnLayout, LayoutPass) {
        let strategy = MultiColumnLayout::new(columns).gutter(GUTTER);
        let pass = strategy.layout(Size::new(W, 600.0), n);
        (strategy, pass)
    }

    #[test]
    fn width_splits_the_viewport_minus_gutters() {
        let (_, pass) = layout_of(2, 4);
        let expected = (W - 2.0 * GUTTER) / 2.0 - 2.0 * GUTTER;
        assert_eq!(pass.metrics(0).unwrap().width, expected);
        assert_eq!(pass.stride(), (W - GUTTER) / 2.0);
    }

    #[test]
    fn first_visible_offsets_land_on_slot_boundaries() {
        let (strategy, pass) = layout_of(2, 4);
        let expected = |i: usize| (W - GUTTER) / 2.0 * i as f32;
        for i in 0..4 {
            let offset = strategy.scroll_offset(&pass, i, PositionIntent::FirstVisible, 0.0);
            assert_eq!(offset, expected(i), "card {i}");
        }
    }

    #[test]
    fn max_scroll_reaches_the_last_board() {
        let (strategy, pass) = layout_of(2, 4);
        let last_board = strategy.scroll_offset(&pass, 2, PositionIntent::FirstVisible, 0.0);
        assert_eq!(pass.max_scroll_offset(), last_board);
        let (_, shallow) = layout_of(2, 2);
        assert_eq!(shallow.max_scroll_offset(), 0.0);
    }

    #[test]
    fn nearest_visible_does_nothing_for_an_onscreen_card() {
        let (strategy, pass) = layout_of(2, 4);
        // Cards 0 and 1 are on screen at rest.
        let offset = strategy.scroll_offset(&pass, 1, PositionIntent::NearestVisible, 0.0);
        assert_eq!(offset, 0.0);
        // Card 2 needs the minimal rightward move.
        let offset = strategy.scroll_offset(&pass, 2, PositionIntent::NearestVisible, 0.0);
        assert!(offset > 0.0);
        assert!(offset < strategy.scroll_offset(&pass, 2, PositionIntent::FirstVisible, 0.0));
    }

    #[test]
    fn active_index_clamps_into_the_visible_range() {
        let (strategy, pass) = layout_of(2, 4);
        // At rest cards 0..=1 are visible; an active index of 3 clamps down.
        assert_eq!(strategy.active_index(&pass, 0.0, 3), Some(1));
        // Scrolled to the end, cards 2..=3 are visible; 0 clamps up.
        let end = pass.max_scroll_offset();
        assert_eq!(strategy.active_index(&pass, end, 0), Some(2));
        // An already-visible active index is untouched.
        assert_eq!(strategy.active_index(&pass, 0.0, 1), Some(1));
    }

    #[test]
    #[should_panic(expected = "scroll target index 4 out of range")]
    fn scroll_offset_past_end_panics() {
        let (strategy, pass) = layout_of(2, 4);
        let _ = strategy.scroll_offset(&pass, 4, PositionIntent::FirstVisible, 0.0);
    }

    #[test]
    #[should_panic(expected = "at least one column")]
    fn zero_columns_panics() {
        let _ = MultiColumnLayout::new(0);
    }

    #[test]
    fn tiny_viewport_does_not_collapse_the_stride() {
        let strategy = MultiColumnLayout::new(2).gutter(GUTTER);
        let pass = strategy.layout(Size::new(0.0, 0.0), 3);
        assert!(pass.stride() >= 1.0);
        assert_eq!(pass.metrics(0).unwrap().width, 0.0);
    }
}

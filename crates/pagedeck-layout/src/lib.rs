#![forbid(unsafe_code)]

//! Scroll and layout control for the deck of cards.
//!
//! This crate turns a card count plus viewport constraints into per-card
//! geometry, and owns the scroll position over that geometry:
//!
//! - [`LayoutStrategy`] - the contract shared by the two concrete layouts
//! - [`SingleColumnLayout`] - one card fills the viewport (phone-style)
//! - [`MultiColumnLayout`] - N equal columns packed left-to-right
//! - [`LayoutPass`] - the measured result of one layout computation
//! - [`ScrollState`] - clamped offset with drag, rubber-band overscroll,
//!   eased animated scrolling and boundary snapping
//!
//! All positions are in content space (independent of scroll); screen
//! positions are derived by subtracting the current offset. The scroll
//! offset is non-negative, increases rightward, and at rest is clamped to
//! `[0, max_scroll_offset]`.

pub mod multi;
pub mod scroll;
pub mod single;

pub use multi::MultiColumnLayout;
pub use pagedeck_core::geometry::{Point, Size};
pub use scroll::ScrollState;
pub use single::SingleColumnLayout;

use std::ops::Range;

/// Default gap between cards and at the deck's outer edges.
pub const DEFAULT_CARD_GUTTER: f32 = 16.0;

/// Release velocity (content units per second) below which a drag release
/// snaps to the nearest card boundary instead of flinging.
pub const FLING_MIN_VELOCITY: f32 = 200.0;

/// Additional release velocity required per extra card of fling travel
/// beyond the first.
pub const FLING_SKIP_STEP: f32 = 1200.0;

/// Where an animated scroll should leave the target card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionIntent {
    /// Card's left edge at the viewport's left edge.
    FirstVisible,
    /// Card's right edge at the viewport's right edge.
    LastVisible,
    /// Scroll the minimum amount needed to bring the card fully into
    /// view; no movement if it is already fully visible.
    NearestVisible,
}

/// Measured geometry for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardMetrics {
    /// Left edge in content space.
    pub x: f32,
    /// Top edge in content space.
    pub y: f32,
    /// Card width.
    pub width: f32,
    /// Opacity, used by insertion/removal fades. Layout sets 1.0; the
    /// orchestrator overwrites it from the card's transition state.
    pub alpha: f32,
}

/// The result of one layout computation: per-card metrics plus the derived
/// scroll bounds.
#[derive(Debug, Clone, Default)]
pub struct LayoutPass {
    viewport: Size,
    stride: f32,
    lead_inset: f32,
    max_scroll: f32,
    metrics: Vec<CardMetrics>,
}

impl LayoutPass {
    /// Build a pass from raw parts. Used by [`LayoutStrategy`] impls.
    pub fn new(
        viewport: Size,
        stride: f32,
        lead_inset: f32,
        max_scroll: f32,
        metrics: Vec<CardMetrics>,
    ) -> Self {
        Self {
            viewport,
            stride,
            lead_inset,
            max_scroll,
            metrics,
        }
    }

    /// Number of cards this pass measured.
    #[inline]
    pub fn card_count(&self) -> usize {
        self.metrics.len()
    }

    /// Viewport the pass was computed against.
    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Distance between consecutive card slots.
    #[inline]
    pub fn stride(&self) -> f32 {
        self.stride
    }

    /// Leading inset between the viewport edge and the first card's slot.
    #[inline]
    pub fn lead_inset(&self) -> f32 {
        self.lead_inset
    }

    /// Largest scroll offset at which content remains to the right.
    #[inline]
    pub fn max_scroll_offset(&self) -> f32 {
        self.max_scroll
    }

    /// Metrics for the card at `index`, if measured.
    pub fn metrics(&self, index: usize) -> Option<&CardMetrics> {
        self.metrics.get(index)
    }

    /// Mutable metrics access (the orchestrator writes alphas here).
    pub fn metrics_mut(&mut self, index: usize) -> Option<&mut CardMetrics> {
        self.metrics.get_mut(index)
    }

    /// Screen-space position of the card at `index` under `offset`.
    pub fn screen_position(&self, index: usize, offset: f32) -> Option<Point> {
        self.metrics
            .get(index)
            .map(|m| Point::new(m.x - offset, m.y))
    }

    /// Half-open range of card indices at least partially visible under
    /// `offset`. Empty when no cards are measured.
    pub fn visible_range(&self, offset: f32) -> Range<usize> {
        let right = offset + self.viewport.width;
        let mut start = None;
        let mut end = 0;
        for (i, m) in self.metrics.iter().enumerate() {
            if m.x + m.width > offset && m.x < right {
                if start.is_none() {
                    start = Some(i);
                }
                end = i + 1;
            }
        }
        match start {
            Some(start) => start..end,
            None => 0..0,
        }
    }

    /// Index of the leftmost at-least-partially-visible card.
    pub fn first_visible(&self, offset: f32) -> Option<usize> {
        let range = self.visible_range(offset);
        if range.is_empty() { None } else { Some(range.start) }
    }

    /// Index of the rightmost at-least-partially-visible card.
    pub fn last_visible(&self, offset: f32) -> Option<usize> {
        let range = self.visible_range(offset);
        if range.is_empty() { None } else { Some(range.end - 1) }
    }

    /// Whether the card at `index` is fully within the viewport.
    pub fn is_fully_visible(&self, index: usize, offset: f32) -> bool {
        self.metrics
            .get(index)
            .is_some_and(|m| m.x >= offset && m.x + m.width <= offset + self.viewport.width)
    }
}

/// The contract shared by the concrete layout strategies.
///
/// A strategy is pure math: it owns no state and recomputes every card's
/// geometry from scratch on each [`LayoutStrategy::layout`] call.
pub trait LayoutStrategy {
    /// How many card slots the viewport presents at once.
    fn visible_columns(&self) -> usize;

    /// Recompute all card metrics and scroll bounds for the given viewport.
    fn layout(&self, viewport: Size, card_count: usize) -> LayoutPass;

    /// Active-card derivation for this strategy: geometric for a single
    /// visible column, clamped-into-visible-range for multiple.
    /// Returns `None` when the pass holds no cards.
    fn active_index(&self, pass: &LayoutPass, offset: f32, current: usize) -> Option<usize>;

    /// Raw scroll offset satisfying `intent` for the card at `index`.
    ///
    /// `current` is the present offset and only affects
    /// [`PositionIntent::NearestVisible`].
    ///
    /// # Panics
    ///
    /// Panics when `index` is outside the measured pass; scrolling to a
    /// nonexistent card is a programmer error.
    fn scroll_offset(
        &self,
        pass: &LayoutPass,
        index: usize,
        intent: PositionIntent,
        current: f32,
    ) -> f32 {
        let count = pass.card_count();
        let m = pass.metrics(index).unwrap_or_else(|| {
            panic!("scroll target index {index} out of range (pass measured {count} cards)")
        });
        let first = m.x - pass.lead_inset();
        let last = m.x + m.width + pass.lead_inset() - pass.viewport().width;
        match intent {
            PositionIntent::FirstVisible => first,
            PositionIntent::LastVisible => last,
            PositionIntent::NearestVisible => current.clamp(last.min(first), first),
        }
    }

    /// Offset a drag release should settle at, given the residual
    /// `velocity` (content units per second, positive rightward).
    ///
    /// Settles exactly on a card-boundary offset: the nearest boundary
    /// when slower than [`FLING_MIN_VELOCITY`], otherwise the next
    /// boundary in the direction of travel plus one extra card per
    /// [`FLING_SKIP_STEP`] of excess velocity.
    fn snap_target(&self, pass: &LayoutPass, offset: f32, velocity: f32) -> f32 {
        let stride = pass.stride();
        if stride <= f32::EPSILON || pass.card_count() == 0 {
            return 0.0;
        }
        let max_boundary = (pass.max_scroll_offset() / stride).round();
        let base = offset / stride;
        let boundary = if velocity.abs() < FLING_MIN_VELOCITY {
            base.round()
        } else {
            let extra = ((velocity.abs() - FLING_MIN_VELOCITY) / FLING_SKIP_STEP).floor();
            if velocity > 0.0 {
                base.floor() + 1.0 + extra
            } else {
                base.ceil() - 1.0 - extra
            }
        };
        (boundary.clamp(0.0, max_boundary) * stride).min(pass.max_scroll_offset())
    }
}

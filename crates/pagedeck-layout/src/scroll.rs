#![forbid(unsafe_code)]

//! Scroll position state: clamping, dragging, overscroll, animation.

use std::time::Duration;

use pagedeck_core::animation::{Animation, Fade, ease_out_cubic, lerp};

/// Duration of an eased animated scroll (activation, snap-back, fling
/// settle).
pub const SCROLL_ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// Fraction of out-of-range drag distance that actually moves the content.
/// Gives the rubber-band feel at the deck's edges.
pub const OVERSCROLL_RESISTANCE: f32 = 0.5;

/// The deck's scroll position.
///
/// The offset is non-negative and increases rightward. At rest it is
/// clamped to `[0, max_offset]`; during an active drag it may transiently
/// leave that range (rubber-banding), and the owner is expected to snap it
/// back once the gesture ends. Animated moves are advanced by
/// [`ScrollState::tick`]; reads during an in-flight animation return the
/// current animated value, not the target.
#[derive(Debug, Clone)]
pub struct ScrollState {
    offset: f32,
    max: f32,
    dragging: bool,
    anim: Option<ScrollAnim>,
}

#[derive(Debug, Clone, Copy)]
struct ScrollAnim {
    from: f32,
    to: f32,
    timer: Fade,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollState {
    /// Create a scroll state at rest at the start of the content.
    pub fn new() -> Self {
        Self {
            offset: 0.0,
            max: 0.0,
            dragging: false,
            anim: None,
        }
    }

    /// Current offset. Mid-animation this is the animated value.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Largest offset reachable at rest.
    #[inline]
    pub fn max_offset(&self) -> f32 {
        self.max
    }

    /// Whether a drag gesture is in progress.
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether an animated move is in flight.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.anim.is_some()
    }

    /// Update the scroll bound after a layout pass.
    ///
    /// An in-flight animation is retargeted into the new range; a resting
    /// offset is re-clamped. A dragging offset is left alone (the
    /// release-time snap handles it).
    pub fn set_max_offset(&mut self, max: f32) {
        self.max = max.max(0.0);
        if let Some(anim) = &mut self.anim {
            anim.to = anim.to.clamp(0.0, self.max);
        } else if !self.dragging {
            self.offset = self.offset.clamp(0.0, self.max);
        }
    }

    /// Move immediately to `target` (clamped), cancelling any animation.
    pub fn jump_to(&mut self, target: f32) {
        self.anim = None;
        self.offset = target.clamp(0.0, self.max);
    }

    /// Start an eased move to `target` (clamped).
    pub fn animate_to(&mut self, target: f32) {
        let to = target.clamp(0.0, self.max);
        if (to - self.offset).abs() <= f32::EPSILON {
            self.jump_to(to);
            return;
        }
        self.anim = Some(ScrollAnim {
            from: self.offset,
            to,
            timer: Fade::new(SCROLL_ANIMATION_DURATION).easing(ease_out_cubic),
        });
    }

    /// Begin a drag gesture, cancelling any in-flight animation.
    pub fn begin_drag(&mut self) {
        self.anim = None;
        self.dragging = true;
    }

    /// Apply a drag delta (in offset units: positive reveals rightward
    /// content). Movement beyond the clamped range is resisted.
    pub fn drag_by(&mut self, delta: f32) {
        if !self.dragging {
            self.begin_drag();
        }
        let raw = self.offset + delta;
        let clamped = raw.clamp(0.0, self.max);
        self.offset = clamped + (raw - clamped) * OVERSCROLL_RESISTANCE;
    }

    /// End the drag gesture. The offset may rest outside the clamped
    /// range; the owner follows up with a snap animation.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Advance an in-flight animation. Returns `true` when the animation
    /// settled on this tick.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(anim) = &mut self.anim else {
            return false;
        };
        anim.timer.tick(dt);
        self.offset = lerp(anim.from, anim.to, anim.timer.value());
        if anim.timer.is_complete() {
            self.offset = anim.to;
            self.anim = None;
            return true;
        }
        false
    }
}

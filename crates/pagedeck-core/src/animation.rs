#![forbid(unsafe_code)]

//! Composable animation primitives.
//!
//! Time-based animations that produce normalized `f32` values (0.0-1.0),
//! advanced by explicit `tick(dt)` calls from the host event loop. Nothing
//! here reads a clock: the caller owns time, which keeps every animated
//! sequence reproducible under simulated time in tests.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out (slower end than quadratic).
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Linear interpolation between `a` and `b` by `t` in [0, 1].
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Tracks elapsed time as [`Duration`] internally for precise accumulation
/// (no floating-point drift).
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and default linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_progresses_linearly() {
        let mut fade = Fade::new(Duration::from_millis(100));
        assert_eq!(fade.value(), 0.0);
        fade.tick(Duration::from_millis(50));
        assert!((fade.value() - 0.5).abs() < 1e-5);
        fade.tick(Duration::from_millis(50));
        assert_eq!(fade.value(), 1.0);
        assert!(fade.is_complete());
    }

    #[test]
    fn fade_clamps_past_end() {
        let mut fade = Fade::new(Duration::from_millis(10));
        fade.tick(Duration::from_secs(1));
        assert_eq!(fade.value(), 1.0);
    }

    #[test]
    fn reset_restarts() {
        let mut fade = Fade::new(Duration::from_millis(10));
        fade.tick(Duration::from_millis(10));
        fade.reset();
        assert_eq!(fade.value(), 0.0);
        assert!(!fade.is_complete());
    }

    #[test]
    fn zero_duration_does_not_divide_by_zero() {
        let fade = Fade::new(Duration::ZERO);
        assert_eq!(fade.value(), 0.0);
    }

    #[test]
    fn easings_hit_endpoints() {
        for f in [linear as EasingFn, ease_out, ease_in_out, ease_out_cubic] {
            assert_eq!(f(0.0), 0.0);
            assert!((f(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn ease_out_front_loads_progress() {
        assert!(ease_out(0.5) > 0.5);
        assert!(ease_out_cubic(0.5) > ease_out(0.5));
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
    }
}

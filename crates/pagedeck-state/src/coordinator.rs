#![forbid(unsafe_code)]

//! Insertion/removal transition sequencing.
//!
//! Animated insertion cannot simply fade a card in: the card's on-screen
//! position is unknown until the rendering collaborator has run at least
//! one layout pass against the new tree, and starting the enter transition
//! before that would animate from a wrong position. So an animated insert
//! runs in phases:
//!
//! 1. the card enters the deck hidden
//! 2. a layout pass measures it - the coordinator requests a
//!    scroll-into-view at that moment
//! 3. a short settle delay lets that pass land on screen
//! 4. the card is revealed, driving the enter fade+slide
//!
//! Removal mirrors the tail: the card hides (exit fade+slide), and only
//! after the transition elapses is it structurally removed. A removal
//! arriving while the card is still hidden (its reveal never fired) tears
//! it down immediately - there is no enter animation to wait out.
//!
//! The coordinator owns no deck state. It answers `tick`/`on_layout_pass`
//! with [`CardEffect`]s and the orchestrator applies them, which keeps
//! every timing race an explicit state transition rather than a callback
//! tangle.

use std::collections::HashMap;
use std::time::Duration;

use pagedeck_core::PageStackId;
use pagedeck_core::animation::{Animation, Fade, ease_out};

/// Delay between a hidden card being measured and its reveal.
///
/// Empirically tuned to let one layout pass land on screen; a tunable,
/// not a semantic contract.
pub const REVEAL_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Duration of the enter and exit fade+slide transitions.
pub const ENTER_EXIT_DURATION: Duration = Duration::from_millis(200);

/// Horizontal travel of the enter/exit slide at zero opacity.
pub const ENTER_SLIDE_DISTANCE: f32 = 24.0;

#[derive(Debug)]
enum CardPhase {
    /// In the deck but not yet revealed. The settle timer runs only once
    /// a layout pass has measured the card.
    Hidden { measured: bool, settle: Fade },
    /// Enter transition in flight.
    Revealing { fade: Fade },
    /// At rest, fully visible.
    Shown,
    /// Exit transition in flight; structural removal follows.
    Exiting { fade: Fade },
}

/// What the orchestrator should do next for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEffect {
    /// A freshly inserted card was measured: activate it and scroll it
    /// into view.
    ScrollIntoView(PageStackId),
    /// The settle delay elapsed: flip the card visible to start its enter
    /// transition.
    Reveal(PageStackId),
    /// The exit transition finished: remove the card from the tree.
    Remove(PageStackId),
}

/// How a removal request should proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    /// Exit transition started; remove once [`CardEffect::Remove`] fires.
    Deferred,
    /// Nothing to animate; remove right away.
    Immediate,
}

/// Per-card transition state machine.
#[derive(Debug, Default)]
pub struct TransitionCoordinator {
    phases: HashMap<PageStackId, CardPhase>,
}

impl TransitionCoordinator {
    /// Create a coordinator tracking no cards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a card inserted hidden (animated insertion).
    pub fn track_hidden(&mut self, id: PageStackId) {
        self.phases.insert(
            id,
            CardPhase::Hidden {
                measured: false,
                settle: Fade::new(REVEAL_SETTLE_DELAY),
            },
        );
    }

    /// Track a card that is already at rest (synchronous insertion,
    /// restored sessions).
    pub fn track_shown(&mut self, id: PageStackId) {
        self.phases.insert(id, CardPhase::Shown);
    }

    /// Stop tracking a card (after structural removal).
    pub fn forget(&mut self, id: PageStackId) {
        self.phases.remove(&id);
    }

    /// Whether any card is mid-transition.
    pub fn is_idle(&self) -> bool {
        self.phases
            .values()
            .all(|phase| matches!(phase, CardPhase::Shown))
    }

    /// Feed one layout pass. `measured` answers whether the pass covered
    /// the given card; hidden cards measured for the first time request a
    /// scroll-into-view and start their settle timer.
    pub fn on_layout_pass(
        &mut self,
        measured: impl Fn(PageStackId) -> bool,
    ) -> Vec<CardEffect> {
        let mut effects = Vec::new();
        for (&id, phase) in &mut self.phases {
            if let CardPhase::Hidden { measured: seen, .. } = phase
                && !*seen
                && measured(id)
            {
                *seen = true;
                effects.push(CardEffect::ScrollIntoView(id));
            }
        }
        effects
    }

    /// Begin removing a card.
    ///
    /// A shown (or revealing) card starts its exit transition; a card
    /// still hidden is torn down immediately - its reveal never fired, so
    /// there is no enter animation to wait out. Untracked cards are also
    /// immediate. A card already exiting stays on its current transition
    /// (double-tapping close does not restart it).
    pub fn begin_removal(&mut self, id: PageStackId) -> RemovalMode {
        match self.phases.get_mut(&id) {
            Some(CardPhase::Hidden { .. }) => {
                self.phases.remove(&id);
                RemovalMode::Immediate
            }
            Some(CardPhase::Exiting { .. }) => RemovalMode::Deferred,
            Some(phase) => {
                *phase = CardPhase::Exiting {
                    fade: Fade::new(ENTER_EXIT_DURATION).easing(ease_out),
                };
                RemovalMode::Deferred
            }
            None => RemovalMode::Immediate,
        }
    }

    /// Advance all transitions by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Vec<CardEffect> {
        let mut effects = Vec::new();
        let mut done_exiting = Vec::new();
        for (&id, phase) in &mut self.phases {
            match phase {
                CardPhase::Hidden {
                    measured: true,
                    settle,
                } => {
                    settle.tick(dt);
                    if settle.is_complete() {
                        *phase = CardPhase::Revealing {
                            fade: Fade::new(ENTER_EXIT_DURATION).easing(ease_out),
                        };
                        effects.push(CardEffect::Reveal(id));
                    }
                }
                CardPhase::Hidden { .. } | CardPhase::Shown => {}
                CardPhase::Revealing { fade } => {
                    fade.tick(dt);
                    if fade.is_complete() {
                        *phase = CardPhase::Shown;
                    }
                }
                CardPhase::Exiting { fade } => {
                    fade.tick(dt);
                    if fade.is_complete() {
                        done_exiting.push(id);
                    }
                }
            }
        }
        for id in done_exiting {
            self.phases.remove(&id);
            effects.push(CardEffect::Remove(id));
        }
        effects
    }

    /// Current opacity for a card. Untracked cards are fully opaque.
    pub fn alpha(&self, id: PageStackId) -> f32 {
        match self.phases.get(&id) {
            None | Some(CardPhase::Shown) => 1.0,
            Some(CardPhase::Hidden { .. }) => 0.0,
            Some(CardPhase::Revealing { fade }) => fade.value(),
            Some(CardPhase::Exiting { fade }) => 1.0 - fade.value(),
        }
    }

    /// Current horizontal slide displacement for a card's transition.
    pub fn slide_offset(&self, id: PageStackId) -> f32 {
        (1.0 - self.alpha(id)) * ENTER_SLIDE_DISTANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> PageStackId {
        PageStackId::from_raw(raw)
    }

    #[test]
    fn reveal_waits_for_measurement_and_settle() {
        let mut tr = TransitionCoordinator::new();
        tr.track_hidden(id(1));
        assert_eq!(tr.alpha(id(1)), 0.0);

        // Time alone does nothing while unmeasured.
        assert!(tr.tick(Duration::from_secs(1)).is_empty());
        assert_eq!(tr.alpha(id(1)), 0.0);

        // First measuring pass requests the scroll-into-view.
        let effects = tr.on_layout_pass(|_| true);
        assert_eq!(effects, vec![CardEffect::ScrollIntoView(id(1))]);
        // A second pass does not re-request it.
        assert!(tr.on_layout_pass(|_| true).is_empty());

        // Settle elapses, reveal fires, alpha ramps up.
        let effects = tr.tick(REVEAL_SETTLE_DELAY);
        assert_eq!(effects, vec![CardEffect::Reveal(id(1))]);
        tr.tick(ENTER_EXIT_DURATION / 2);
        let mid = tr.alpha(id(1));
        assert!(mid > 0.0 && mid < 1.0, "mid-transition alpha: {mid}");
        tr.tick(ENTER_EXIT_DURATION);
        assert_eq!(tr.alpha(id(1)), 1.0);
        assert!(tr.is_idle());
    }

    #[test]
    fn unmeasured_cards_never_settle() {
        let mut tr = TransitionCoordinator::new();
        tr.track_hidden(id(1));
        assert!(tr.on_layout_pass(|_| false).is_empty());
        assert!(tr.tick(Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn removal_of_a_shown_card_is_deferred() {
        let mut tr = TransitionCoordinator::new();
        tr.track_shown(id(1));
        assert_eq!(tr.begin_removal(id(1)), RemovalMode::Deferred);
        tr.tick(ENTER_EXIT_DURATION / 2);
        let mid = tr.alpha(id(1));
        assert!(mid > 0.0 && mid < 1.0, "mid-exit alpha: {mid}");
        let effects = tr.tick(ENTER_EXIT_DURATION);
        assert_eq!(effects, vec![CardEffect::Remove(id(1))]);
        // The card is no longer tracked once removal fires.
        assert!(tr.is_idle());
    }

    #[test]
    fn removal_of_a_hidden_card_is_immediate() {
        let mut tr = TransitionCoordinator::new();
        tr.track_hidden(id(1));
        assert_eq!(tr.begin_removal(id(1)), RemovalMode::Immediate);
        assert!(tr.tick(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn repeated_removal_does_not_restart_the_exit() {
        let mut tr = TransitionCoordinator::new();
        tr.track_shown(id(1));
        tr.begin_removal(id(1));
        tr.tick(ENTER_EXIT_DURATION / 2);
        let mid = tr.alpha(id(1));
        assert_eq!(tr.begin_removal(id(1)), RemovalMode::Deferred);
        assert_eq!(tr.alpha(id(1)), mid);
    }

    #[test]
    fn untracked_cards_are_opaque_and_removal_immediate() {
        let mut tr = TransitionCoordinator::new();
        assert_eq!(tr.alpha(id(9)), 1.0);
        assert_eq!(tr.begin_removal(id(9)), RemovalMode::Immediate);
    }

    #[test]
    fn slide_mirrors_alpha() {
        let mut tr = TransitionCoordinator::new();
        tr.track_hidden(id(1));
        assert_eq!(tr.slide_offset(id(1)), ENTER_SLIDE_DISTANCE);
        tr.track_shown(id(1));
        assert_eq!(tr.slide_offset(id(1)), 0.0);
    }
}

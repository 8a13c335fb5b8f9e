//! Visibility state machine
//!
//! Three states with a fixed transition table:
//!
//! ```text
//!            ScrollActivity          GestureBegan
//!   Hidden ─────────────────▶ Scrolling ─────────────▶ Scrubbing
//!     ▲                          │  ▲                      │
//!     └──────── HideTimer ───────┘  └────── GestureEnded ──┘
//! ```
//!
//! `HideTimer` has no edge out of `Scrubbing`, which is what keeps a late
//! timer from hiding the scrubber mid-drag.

use serde::{Deserialize, Serialize};

use crate::fsm::{StateMachine, Transition};

/// Scrubber visibility and interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubberState {
    /// Collapsed to a thin hit target, label invisible
    #[default]
    Hidden,
    /// Visible because the content is moving
    Scrolling,
    /// The user is dragging the marker
    Scrubbing,
}

impl ScrubberState {
    /// Check if the scrubber should be drawn expanded
    pub fn is_visible(&self) -> bool {
        !matches!(self, ScrubberState::Hidden)
    }

    /// Visual target for this state
    pub fn profile(&self) -> VisualProfile {
        match self {
            ScrubberState::Hidden => VisualProfile {
                width: WidthClass::Collapsed,
                margin: MarginClass::Hidden,
                label_visible: false,
            },
            ScrubberState::Scrolling => VisualProfile {
                width: WidthClass::Scrolling,
                margin: MarginClass::Scrolling,
                label_visible: true,
            },
            ScrubberState::Scrubbing => VisualProfile {
                width: WidthClass::Scrubbing,
                margin: MarginClass::Hidden,
                label_visible: true,
            },
        }
    }
}

/// Inputs understood by the visibility state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityInput {
    ScrollActivity,
    GestureBegan,
    GestureEnded,
    HideTimer,
}

/// Width of the marker container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthClass {
    Collapsed,
    Scrolling,
    Scrubbing,
}

/// Trailing margin of the marker container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginClass {
    Hidden,
    Scrolling,
}

/// What a renderer should animate towards when a state becomes active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualProfile {
    pub width: WidthClass,
    pub margin: MarginClass,
    pub label_visible: bool,
}

/// Build the scrubber's visibility machine, starting hidden
pub fn visibility_machine() -> StateMachine<ScrubberState, VisibilityInput> {
    use ScrubberState::*;
    use VisibilityInput::*;

    StateMachine::builder(Hidden)
        .on(Hidden, ScrollActivity, Scrolling)
        .on(Hidden, GestureBegan, Scrolling)
        .on(Scrolling, GestureBegan, Scrubbing)
        .on(Scrubbing, GestureEnded, Scrolling)
        .on(Scrolling, HideTimer, Hidden)
        .build()
}

/// Drive the machine into `Scrubbing`, passing through `Scrolling` when hidden
///
/// Returns every transition taken, in order.
pub fn begin_scrubbing(
    fsm: &mut StateMachine<ScrubberState, VisibilityInput>,
) -> Vec<Transition<ScrubberState, VisibilityInput>> {
    let mut taken = Vec::with_capacity(2);
    while !fsm.is_in(ScrubberState::Scrubbing) {
        match fsm.send(VisibilityInput::GestureBegan) {
            Some(t) => taken.push(t),
            None => break,
        }
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_shows() {
        let mut fsm = visibility_machine();
        fsm.send(VisibilityInput::ScrollActivity);
        assert!(fsm.is_in(ScrubberState::Scrolling));

        // Scroll activity while already visible is not a transition
        assert_eq!(fsm.send(VisibilityInput::ScrollActivity), None);
    }

    #[test]
    fn test_hide_timer_blocked_while_scrubbing() {
        let mut fsm = visibility_machine();
        fsm.send(VisibilityInput::ScrollActivity);
        fsm.send(VisibilityInput::GestureBegan);
        assert!(fsm.is_in(ScrubberState::Scrubbing));

        assert_eq!(fsm.send(VisibilityInput::HideTimer), None);
        assert!(fsm.is_in(ScrubberState::Scrubbing));
    }

    #[test]
    fn test_begin_from_hidden_passes_through_scrolling() {
        let mut fsm = visibility_machine();
        let taken = begin_scrubbing(&mut fsm);

        let path: Vec<_> = taken.iter().map(|t| (t.from_state, t.to_state)).collect();
        assert_eq!(
            path,
            vec![
                (ScrubberState::Hidden, ScrubberState::Scrolling),
                (ScrubberState::Scrolling, ScrubberState::Scrubbing),
            ]
        );
        assert!(begin_scrubbing(&mut fsm).is_empty());
    }

    #[test]
    fn test_gesture_end_only_leaves_scrubbing() {
        let mut fsm = visibility_machine();
        assert_eq!(fsm.send(VisibilityInput::GestureEnded), None);
        fsm.send(VisibilityInput::ScrollActivity);
        assert_eq!(fsm.send(VisibilityInput::GestureEnded), None);
        assert!(fsm.is_in(ScrubberState::Scrolling));
    }

    #[test]
    fn test_profiles() {
        assert!(!ScrubberState::Hidden.profile().label_visible);
        assert_eq!(ScrubberState::Hidden.profile().width, WidthClass::Collapsed);
        assert!(ScrubberState::Scrolling.profile().label_visible);
        assert_eq!(ScrubberState::Scrubbing.profile().margin, MarginClass::Hidden);
    }

    #[test]
    fn test_visibility_matches_label() {
        for state in [ScrubberState::Hidden, ScrubberState::Scrolling, ScrubberState::Scrubbing] {
            assert_eq!(state.is_visible(), state.profile().label_visible);
        }
        assert!(!ScrubberState::Hidden.is_visible());
        assert!(ScrubberState::Scrubbing.is_visible());
    }
}

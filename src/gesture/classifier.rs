//! Gesture Classifier
//!
//! Combines the geometric predicates into at most one label per hand per
//! frame. The precedence order is fixed and first match wins:
//!
//! ```text
//! IndexUp > Pinch > MiddleThumbTap > TwoFingersUp > TwoFingersDown
//!         > FiveFingersUp > FiveFingersDown
//! ```
//!
//! The classifier is handedness-agnostic. Which predicates a hand actually
//! acts on is decided by the control state machine.

use serde::Serialize;
use std::fmt;
use tracing::trace;

use super::predicates;
use crate::config::ThresholdProfile;
use crate::landmark::{Handedness, LandmarkSet};

/// Classified gesture for one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    IndexUp,
    Pinch,
    MiddleThumbTap,
    TwoFingersUp,
    TwoFingersDown,
    FiveFingersUp,
    FiveFingersDown,
}

impl GestureLabel {
    /// Labels in priority order, highest first
    pub const PRIORITY: [GestureLabel; 7] = [
        GestureLabel::IndexUp,
        GestureLabel::Pinch,
        GestureLabel::MiddleThumbTap,
        GestureLabel::TwoFingersUp,
        GestureLabel::TwoFingersDown,
        GestureLabel::FiveFingersUp,
        GestureLabel::FiveFingersDown,
    ];

    /// 1-based rank; lower wins
    pub fn priority(&self) -> u8 {
        match self {
            GestureLabel::IndexUp => 1,
            GestureLabel::Pinch => 2,
            GestureLabel::MiddleThumbTap => 3,
            GestureLabel::TwoFingersUp => 4,
            GestureLabel::TwoFingersDown => 5,
            GestureLabel::FiveFingersUp => 6,
            GestureLabel::FiveFingersDown => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::IndexUp => "Index Up",
            GestureLabel::Pinch => "Pinch",
            GestureLabel::MiddleThumbTap => "Middle-Thumb Tap",
            GestureLabel::TwoFingersUp => "Two Fingers Up",
            GestureLabel::TwoFingersDown => "Two Fingers Down",
            GestureLabel::FiveFingersUp => "Five Fingers Up",
            GestureLabel::FiveFingersDown => "Five Fingers Down",
        }
    }

    /// Status line form, e.g. `"Pinch - Right hand"`
    pub fn describe(&self, handedness: Handedness) -> String {
        format!("{} - {} hand", self.as_str(), handedness)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every predicate evaluated once for one hand in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoseSnapshot {
    pub index_up: bool,
    pub pinch: bool,
    pub middle_thumb_tap: bool,
    pub two_fingers_up: bool,
    pub two_fingers_down: bool,
    pub three_fingers_up: bool,
    pub three_fingers_down: bool,
    pub five_fingers_up: bool,
    pub five_fingers_down: bool,
    pub fingers_apart: bool,
    pub index_middle_together: bool,
    pub pinky_up: bool,
    pub pinky_down: bool,
    pub palm_facing_up: bool,
    pub palm_facing_down: bool,
}

impl PoseSnapshot {
    pub fn evaluate(hand: &LandmarkSet, profile: &ThresholdProfile) -> Self {
        let snapshot = Self {
            index_up: predicates::index_up(hand),
            pinch: predicates::pinch(hand, profile),
            middle_thumb_tap: predicates::middle_thumb_tap(hand, profile),
            two_fingers_up: predicates::two_fingers_up(hand),
            two_fingers_down: predicates::two_fingers_down(hand),
            three_fingers_up: predicates::three_fingers_up(hand),
            three_fingers_down: predicates::three_fingers_down(hand),
            five_fingers_up: predicates::five_fingers_up(hand),
            five_fingers_down: predicates::five_fingers_down(hand),
            fingers_apart: predicates::fingers_apart(hand, profile),
            index_middle_together: predicates::index_middle_together(hand, profile),
            pinky_up: predicates::pinky_up(hand),
            pinky_down: predicates::pinky_down(hand),
            palm_facing_up: predicates::palm_facing_up(hand),
            palm_facing_down: predicates::palm_facing_down(hand),
        };
        trace!(?snapshot, "Pose evaluated");
        snapshot
    }

    fn holds(&self, label: GestureLabel) -> bool {
        match label {
            GestureLabel::IndexUp => self.index_up,
            GestureLabel::Pinch => self.pinch,
            GestureLabel::MiddleThumbTap => self.middle_thumb_tap,
            GestureLabel::TwoFingersUp => self.two_fingers_up,
            GestureLabel::TwoFingersDown => self.two_fingers_down,
            GestureLabel::FiveFingersUp => self.five_fingers_up,
            GestureLabel::FiveFingersDown => self.five_fingers_down,
        }
    }

    /// Highest-priority label whose predicate holds
    pub fn label(&self) -> Option<GestureLabel> {
        GestureLabel::PRIORITY
            .into_iter()
            .find(|label| self.holds(*label))
    }
}

/// Classify one hand under the given profile
pub fn classify(hand: &LandmarkSet, profile: &ThresholdProfile) -> Option<GestureLabel> {
    PoseSnapshot::evaluate(hand, profile).label()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::fixtures::{Finger, HandBuilder};
    use proptest::prelude::*;

    fn two_up() -> HandBuilder {
        HandBuilder::neutral()
            .raise(Finger::Index)
            .raise(Finger::Middle)
            .fold(Finger::Ring)
            .fold(Finger::Pinky)
    }

    #[test]
    fn test_no_match_is_none() {
        let hand = HandBuilder::neutral().build();
        assert_eq!(classify(&hand, &ThresholdProfile::standard()), None);
    }

    #[test]
    fn test_two_fingers_up_label() {
        let hand = two_up().build();
        assert_eq!(
            classify(&hand, &ThresholdProfile::standard()),
            Some(GestureLabel::TwoFingersUp)
        );
    }

    #[test]
    fn test_pinch_beats_two_fingers_up() {
        let hand = two_up().pinch().build();
        let snapshot = PoseSnapshot::evaluate(&hand, &ThresholdProfile::standard());
        assert!(snapshot.pinch);
        assert!(snapshot.two_fingers_up);
        assert_eq!(snapshot.label(), Some(GestureLabel::Pinch));
    }

    #[test]
    fn test_middle_tap_beats_two_fingers_up() {
        let hand = two_up().middle_tap().build();
        assert_eq!(
            classify(&hand, &ThresholdProfile::standard()),
            Some(GestureLabel::MiddleThumbTap)
        );
    }

    #[test]
    fn test_index_up_beats_pinch() {
        let hand = HandBuilder::neutral()
            .raise(Finger::Index)
            .fold(Finger::Middle)
            .fold(Finger::Ring)
            .fold(Finger::Pinky)
            .pinch()
            .build();
        assert_eq!(
            classify(&hand, &ThresholdProfile::standard()),
            Some(GestureLabel::IndexUp)
        );
    }

    #[test]
    fn test_open_palm_and_fist() {
        let profile = ThresholdProfile::standard();
        assert_eq!(
            classify(&HandBuilder::open_palm().build(), &profile),
            Some(GestureLabel::FiveFingersUp)
        );
        assert_eq!(
            classify(&HandBuilder::fist().build(), &profile),
            Some(GestureLabel::FiveFingersDown)
        );
    }

    #[test]
    fn test_profile_changes_outcome() {
        // Thumb 0.08 from the index tip: outside default, inside precise.
        let hand = HandBuilder::neutral()
            .at(crate::landmark::LandmarkRole::ThumbTip, 0.37, 0.60)
            .build();
        assert_eq!(classify(&hand, &ThresholdProfile::standard()), None);
        assert_eq!(
            classify(&hand, &ThresholdProfile::precise()),
            Some(GestureLabel::Pinch)
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            GestureLabel::Pinch.describe(Handedness::Right),
            "Pinch - Right hand"
        );
        assert_eq!(
            GestureLabel::FiveFingersUp.describe(Handedness::Left),
            "Five Fingers Up - Left hand"
        );
    }

    #[test]
    fn test_priority_table_is_ordered() {
        let ranks: Vec<u8> = GestureLabel::PRIORITY.iter().map(|l| l.priority()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    proptest! {
        #[test]
        fn label_is_highest_priority_match(bits in prop::collection::vec(any::<bool>(), 7)) {
            let snapshot = PoseSnapshot {
                index_up: bits[0],
                pinch: bits[1],
                middle_thumb_tap: bits[2],
                two_fingers_up: bits[3],
                two_fingers_down: bits[4],
                five_fingers_up: bits[5],
                five_fingers_down: bits[6],
                ..PoseSnapshot::default()
            };
            let expected = bits
                .iter()
                .position(|b| *b)
                .map(|i| GestureLabel::PRIORITY[i]);
            prop_assert_eq!(snapshot.label(), expected);
        }
    }
}

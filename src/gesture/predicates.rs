//! Geometric Predicates
//!
//! Pure boolean tests over one hand's landmarks. "Up" always means a
//! smaller `y` (image rows grow downward). Distances are plain Euclidean
//! norms in landmark space with no camera correction.
//!
//! A predicate that needs a landmark the observation does not carry is
//! simply not satisfied: the lookup failure is logged at `trace` and the
//! predicate returns `false`.

use tracing::trace;

use crate::config::ThresholdProfile;
use crate::error::Result;
use crate::landmark::{HandObservation, LandmarkRole as R, LandmarkSet};

/// Run a fallible check, mapping any lookup failure to `false`.
fn evaluate(name: &'static str, check: impl FnOnce() -> Result<bool>) -> bool {
    match check() {
        Ok(holds) => holds,
        Err(e) => {
            trace!(predicate = name, "Predicate not satisfied: {}", e);
            false
        }
    }
}

fn y(hand: &LandmarkSet, role: R) -> Result<f64> {
    Ok(hand.require(role)?.y)
}

fn z(hand: &LandmarkSet, role: R) -> Result<f64> {
    Ok(hand.require(role)?.z)
}

fn tip_distance(hand: &LandmarkSet, a: R, b: R) -> Result<f64> {
    Ok(hand.require(a)?.distance(hand.require(b)?))
}

/// Index and middle up; ring and pinky tips below the middle tip.
pub fn two_fingers_up(hand: &LandmarkSet) -> bool {
    evaluate("two_fingers_up", || {
        let middle_tip = y(hand, R::MiddleFingerTip)?;
        Ok(y(hand, R::IndexFingerTip)? < y(hand, R::IndexFingerPip)?
            && middle_tip < y(hand, R::MiddleFingerPip)?
            && y(hand, R::RingFingerTip)? > middle_tip
            && y(hand, R::PinkyTip)? > middle_tip)
    })
}

/// Index and middle folded below their PIPs and the wrist; ring and pinky
/// tips above the middle PIP.
pub fn two_fingers_down(hand: &LandmarkSet) -> bool {
    evaluate("two_fingers_down", || {
        let wrist = y(hand, R::Wrist)?;
        let index_tip = y(hand, R::IndexFingerTip)?;
        let middle_tip = y(hand, R::MiddleFingerTip)?;
        let middle_pip = y(hand, R::MiddleFingerPip)?;

        let index_down = index_tip > y(hand, R::IndexFingerPip)? && index_tip > wrist;
        let middle_down = middle_tip > middle_pip && middle_tip > wrist;
        let others_up = y(hand, R::RingFingerTip)? < middle_pip && y(hand, R::PinkyTip)? < middle_pip;

        Ok(index_down && middle_down && others_up)
    })
}

/// Index, middle and ring up; pinky tip below the ring tip.
pub fn three_fingers_up(hand: &LandmarkSet) -> bool {
    evaluate("three_fingers_up", || {
        let ring_tip = y(hand, R::RingFingerTip)?;
        Ok(y(hand, R::IndexFingerTip)? < y(hand, R::IndexFingerPip)?
            && y(hand, R::MiddleFingerTip)? < y(hand, R::MiddleFingerPip)?
            && ring_tip < y(hand, R::RingFingerPip)?
            && y(hand, R::PinkyTip)? > ring_tip)
    })
}

/// Index, middle and ring tips below their PIPs.
pub fn three_fingers_down(hand: &LandmarkSet) -> bool {
    evaluate("three_fingers_down", || {
        Ok(y(hand, R::IndexFingerTip)? > y(hand, R::IndexFingerPip)?
            && y(hand, R::MiddleFingerTip)? > y(hand, R::MiddleFingerPip)?
            && y(hand, R::RingFingerTip)? > y(hand, R::RingFingerPip)?)
    })
}

/// Every non-thumb tip is above its PIP.
pub fn five_fingers_up(hand: &LandmarkSet) -> bool {
    evaluate("five_fingers_up", || all_tips(hand, |tip, pip| tip < pip))
}

/// Every non-thumb tip is below its PIP.
pub fn five_fingers_down(hand: &LandmarkSet) -> bool {
    evaluate("five_fingers_down", || all_tips(hand, |tip, pip| tip > pip))
}

fn all_tips(hand: &LandmarkSet, cmp: impl Fn(f64, f64) -> bool) -> Result<bool> {
    for tip in R::finger_tips() {
        let Some(pip) = R::pip_of(tip) else {
            continue;
        };
        if !cmp(y(hand, tip)?, y(hand, pip)?) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Index tip touches the thumb tip.
pub fn pinch(hand: &LandmarkSet, profile: &ThresholdProfile) -> bool {
    evaluate("pinch", || {
        Ok(tip_distance(hand, R::IndexFingerTip, R::ThumbTip)? < profile.pinch_distance)
    })
}

/// Middle tip touches the thumb tip.
pub fn middle_thumb_tap(hand: &LandmarkSet, profile: &ThresholdProfile) -> bool {
    evaluate("middle_thumb_tap", || {
        Ok(tip_distance(hand, R::MiddleFingerTip, R::ThumbTip)? < profile.pinch_distance)
    })
}

/// Index and middle tips spread apart.
pub fn fingers_apart(hand: &LandmarkSet, profile: &ThresholdProfile) -> bool {
    evaluate("fingers_apart", || {
        Ok(tip_distance(hand, R::IndexFingerTip, R::MiddleFingerTip)?
            > profile.fingers_apart_distance)
    })
}

/// Index and middle tips held together.
pub fn index_middle_together(hand: &LandmarkSet, profile: &ThresholdProfile) -> bool {
    evaluate("index_middle_together", || {
        Ok(tip_distance(hand, R::IndexFingerTip, R::MiddleFingerTip)?
            < profile.fingers_together_distance)
    })
}

pub fn pinky_up(hand: &LandmarkSet) -> bool {
    evaluate("pinky_up", || Ok(y(hand, R::PinkyTip)? < y(hand, R::PinkyPip)?))
}

/// Pinky folded while the other fingers and the thumb are folded too.
pub fn pinky_down(hand: &LandmarkSet) -> bool {
    evaluate("pinky_down", || {
        Ok(y(hand, R::PinkyTip)? > y(hand, R::PinkyPip)?
            && y(hand, R::IndexFingerTip)? > y(hand, R::IndexFingerPip)?
            && y(hand, R::MiddleFingerTip)? > y(hand, R::MiddleFingerPip)?
            && y(hand, R::RingFingerTip)? > y(hand, R::RingFingerPip)?
            && y(hand, R::ThumbTip)? > y(hand, R::ThumbIp)?)
    })
}

/// Index up with the other three tips below the index PIP.
pub fn index_up(hand: &LandmarkSet) -> bool {
    evaluate("index_up", || {
        let index_pip = y(hand, R::IndexFingerPip)?;
        Ok(y(hand, R::IndexFingerTip)? < index_pip
            && y(hand, R::MiddleFingerTip)? > index_pip
            && y(hand, R::RingFingerTip)? > index_pip
            && y(hand, R::PinkyTip)? > index_pip)
    })
}

/// Open hand with the index/middle/ring knuckles closer to the camera than the wrist.
pub fn palm_facing_up(hand: &LandmarkSet) -> bool {
    evaluate("palm_facing_up", || {
        let wrist = z(hand, R::Wrist)?;
        Ok(z(hand, R::MiddleFingerMcp)? < wrist
            && z(hand, R::IndexFingerMcp)? < wrist
            && z(hand, R::RingFingerMcp)? < wrist
            && five_fingers_up(hand))
    })
}

/// Open hand with the index/middle/ring knuckles farther than the wrist.
pub fn palm_facing_down(hand: &LandmarkSet) -> bool {
    evaluate("palm_facing_down", || {
        let wrist = z(hand, R::Wrist)?;
        Ok(z(hand, R::MiddleFingerMcp)? > wrist
            && z(hand, R::IndexFingerMcp)? > wrist
            && z(hand, R::RingFingerMcp)? > wrist
            && five_fingers_up(hand))
    })
}

/// Two hands of opposite handedness with wrists close together (x/y only).
pub fn namaste(a: &HandObservation, b: &HandObservation, profile: &ThresholdProfile) -> bool {
    if a.handedness == b.handedness {
        return false;
    }
    evaluate("namaste", || {
        let wrist_a = a.landmarks.require(R::Wrist)?;
        let wrist_b = b.landmarks.require(R::Wrist)?;
        Ok(wrist_a.planar_distance(wrist_b) < profile.namaste_distance)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::fixtures::{Finger, HandBuilder};
    use crate::landmark::{Handedness, Point3};
    use proptest::prelude::*;

    fn profile() -> ThresholdProfile {
        ThresholdProfile::standard()
    }

    /// index tip y=0.3, index pip y=0.5, every other landmark y=0.8
    fn index_only_fixture() -> LandmarkSet {
        let mut points = vec![Point3::new(0.5, 0.8, 0.0); 21];
        points[R::IndexFingerTip.index()] = Point3::new(0.5, 0.3, 0.0);
        points[R::IndexFingerPip.index()] = Point3::new(0.5, 0.5, 0.0);
        LandmarkSet::new(points)
    }

    #[test]
    fn test_index_only_fixture_table() {
        let hand = index_only_fixture();
        let p = profile();

        assert!(index_up(&hand));
        assert!(!two_fingers_up(&hand));
        assert!(!two_fingers_down(&hand));
        assert!(!three_fingers_up(&hand));
        assert!(!three_fingers_down(&hand));
        assert!(!five_fingers_up(&hand));
        assert!(!five_fingers_down(&hand));
        assert!(!pinch(&hand, &p));
        assert!(!middle_thumb_tap(&hand, &p));
        assert!(fingers_apart(&hand, &p));
        assert!(!index_middle_together(&hand, &p));
        assert!(!pinky_up(&hand));
        assert!(!pinky_down(&hand));
        assert!(!palm_facing_up(&hand));
        assert!(!palm_facing_down(&hand));
    }

    #[test]
    fn test_neutral_pose_matches_nothing() {
        let hand = HandBuilder::neutral().build();
        let p = profile();

        assert!(!index_up(&hand));
        assert!(!two_fingers_up(&hand));
        assert!(!two_fingers_down(&hand));
        assert!(!five_fingers_up(&hand));
        assert!(!five_fingers_down(&hand));
        assert!(!pinch(&hand, &p));
        assert!(!middle_thumb_tap(&hand, &p));
        assert!(!fingers_apart(&hand, &p));
        assert!(!index_middle_together(&hand, &p));
        assert!(!pinky_up(&hand));
        assert!(!pinky_down(&hand));
    }

    #[test]
    fn test_two_fingers_up() {
        let hand = HandBuilder::neutral()
            .raise(Finger::Index)
            .raise(Finger::Middle)
            .fold(Finger::Ring)
            .fold(Finger::Pinky)
            .build();
        assert!(two_fingers_up(&hand));
        assert!(!five_fingers_up(&hand));
        assert!(!index_up(&hand));
    }

    #[test]
    fn test_two_fingers_up_requires_ring_below_middle() {
        let hand = HandBuilder::neutral()
            .raise(Finger::Index)
            .raise(Finger::Middle)
            .raise(Finger::Ring)
            .fold(Finger::Pinky)
            .build();
        // Ring tip at the same height as the middle tip is not "below" it.
        assert!(!two_fingers_up(&hand));
        assert!(three_fingers_up(&hand));
    }

    #[test]
    fn test_two_fingers_down() {
        let hand = HandBuilder::neutral()
            .at(R::IndexFingerTip, 0.45, 0.95)
            .at(R::MiddleFingerTip, 0.51, 0.95)
            .raise(Finger::Ring)
            .raise(Finger::Pinky)
            .build();
        assert!(two_fingers_down(&hand));

        // Folded but still above the wrist: not down enough.
        let hand = HandBuilder::neutral()
            .fold(Finger::Index)
            .fold(Finger::Middle)
            .raise(Finger::Ring)
            .raise(Finger::Pinky)
            .build();
        assert!(!two_fingers_down(&hand));
    }

    #[test]
    fn test_three_fingers_down() {
        let hand = HandBuilder::neutral()
            .fold(Finger::Index)
            .fold(Finger::Middle)
            .fold(Finger::Ring)
            .build();
        assert!(three_fingers_down(&hand));
        assert!(!five_fingers_down(&hand));
    }

    #[test]
    fn test_five_fingers() {
        let open = HandBuilder::open_palm().build();
        assert!(five_fingers_up(&open));
        assert!(!five_fingers_down(&open));

        let fist = HandBuilder::fist().build();
        assert!(five_fingers_down(&fist));
        assert!(!five_fingers_up(&fist));
    }

    #[test]
    fn test_pinch_and_tap() {
        let p = profile();
        let hand = HandBuilder::neutral().pinch().build();
        assert!(pinch(&hand, &p));
        assert!(!middle_thumb_tap(&hand, &p));

        let hand = HandBuilder::neutral().middle_tap().build();
        assert!(middle_thumb_tap(&hand, &p));
        assert!(!pinch(&hand, &p));
    }

    #[test]
    fn test_pinch_uses_depth() {
        let p = profile();
        let hand = HandBuilder::neutral().pinch().build();
        let thumb = *hand.get(R::ThumbTip).unwrap();
        let hand = HandBuilder::from_set(hand)
            .at_z(R::ThumbTip, thumb.x, thumb.y, 0.2)
            .build();
        assert!(!pinch(&hand, &p));
    }

    #[test]
    fn test_apart_and_together() {
        let p = profile();
        let hand = HandBuilder::neutral().spread().build();
        assert!(fingers_apart(&hand, &p));
        assert!(!index_middle_together(&hand, &p));

        let hand = HandBuilder::neutral().together().build();
        assert!(index_middle_together(&hand, &p));
        assert!(!fingers_apart(&hand, &p));
    }

    #[test]
    fn test_together_threshold_comes_from_profile() {
        let hand = HandBuilder::neutral().build();
        let mut p = profile();
        assert!(!index_middle_together(&hand, &p));
        p.fingers_together_distance = 0.1;
        assert!(index_middle_together(&hand, &p));
    }

    #[test]
    fn test_pinky() {
        let hand = HandBuilder::neutral().raise(Finger::Pinky).build();
        assert!(pinky_up(&hand));
        assert!(!pinky_down(&hand));

        let hand = HandBuilder::fist().fold_thumb().build();
        assert!(pinky_down(&hand));

        // Thumb not folded below its IP joint.
        let hand = HandBuilder::fist().build();
        assert!(!pinky_down(&hand));
    }

    #[test]
    fn test_index_up_requires_others_below_pip() {
        let hand = HandBuilder::neutral().raise(Finger::Index).build();
        // Other tips sit exactly at the index PIP height.
        assert!(!index_up(&hand));

        let hand = HandBuilder::neutral()
            .raise(Finger::Index)
            .fold(Finger::Middle)
            .fold(Finger::Ring)
            .fold(Finger::Pinky)
            .build();
        assert!(index_up(&hand));
    }

    #[test]
    fn test_palm_facing() {
        let up = HandBuilder::open_palm().knuckles_z(-0.05).build();
        assert!(palm_facing_up(&up));
        assert!(!palm_facing_down(&up));

        let down = HandBuilder::open_palm().knuckles_z(0.05).build();
        assert!(palm_facing_down(&down));
        assert!(!palm_facing_up(&down));

        let closed = HandBuilder::fist().knuckles_z(-0.05).build();
        assert!(!palm_facing_up(&closed));
    }

    #[test]
    fn test_namaste_requires_differing_handedness() {
        let p = profile();
        let left = HandObservation::new(
            Handedness::Left,
            HandBuilder::neutral().wrist_at(0.50, 0.8).build(),
        );
        let right = HandObservation::new(
            Handedness::Right,
            HandBuilder::neutral().wrist_at(0.55, 0.8).build(),
        );
        assert!(namaste(&left, &right, &p));

        let right_too = HandObservation::new(Handedness::Right, left.landmarks.clone());
        assert!(!namaste(&right_too, &right, &p));

        let far = HandObservation::new(
            Handedness::Right,
            HandBuilder::neutral().wrist_at(0.9, 0.8).build(),
        );
        assert!(!namaste(&left, &far, &p));
    }

    #[test]
    fn test_namaste_ignores_depth() {
        let p = profile();
        let left = HandObservation::new(
            Handedness::Left,
            HandBuilder::neutral().wrist_at(0.5, 0.8).build(),
        );
        let right = HandObservation::new(
            Handedness::Right,
            HandBuilder::neutral()
                .at_z(R::Wrist, 0.5, 0.8, 0.9)
                .build(),
        );
        assert!(namaste(&left, &right, &p));
    }

    #[test]
    fn test_missing_landmarks_are_not_satisfied() {
        let p = profile();
        let partial = LandmarkSet::new(vec![Point3::new(0.5, 0.5, 0.0); 9]);
        assert!(!two_fingers_up(&partial));
        assert!(!five_fingers_up(&partial));
        assert!(!five_fingers_down(&partial));
        assert!(!fingers_apart(&partial, &p));
        assert!(!pinky_up(&partial));
        assert!(!index_up(&partial));

        let empty = LandmarkSet::default();
        assert!(!pinch(&empty, &p));
        assert!(!palm_facing_up(&empty));
    }

    proptest! {
        #[test]
        fn five_up_and_five_down_are_exclusive(ys in prop::collection::vec(0.0f64..1.0, 21)) {
            let points = ys.into_iter().map(|y| Point3::new(0.5, y, 0.0)).collect();
            let hand = LandmarkSet::new(points);
            prop_assert!(!(five_fingers_up(&hand) && five_fingers_down(&hand)));
        }

        #[test]
        fn apart_and_together_are_exclusive(dx in 0.0f64..0.3, dy in 0.0f64..0.3) {
            let p = ThresholdProfile::standard();
            let hand = HandBuilder::neutral()
                .at(R::MiddleFingerTip, 0.45 + dx, 0.6 + dy)
                .build();
            prop_assert!(!(fingers_apart(&hand, &p) && index_middle_together(&hand, &p)));
        }
    }
}

//! Synthetic hand poses for unit tests.
//!
//! The neutral pose is laid out so that no predicate holds under the
//! default profile: every finger tip sits exactly at its PIP height, the
//! thumb is far from both tips, and the index/middle gap (0.06) lies
//! between the together (0.05) and apart (0.07) thresholds.

use crate::landmark::{Handedness, HandObservation, LandmarkRole as R, LandmarkSet, Point3};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    fn joints(self) -> (R, R, R) {
        match self {
            Finger::Index => (R::IndexFingerPip, R::IndexFingerDip, R::IndexFingerTip),
            Finger::Middle => (R::MiddleFingerPip, R::MiddleFingerDip, R::MiddleFingerTip),
            Finger::Ring => (R::RingFingerPip, R::RingFingerDip, R::RingFingerTip),
            Finger::Pinky => (R::PinkyPip, R::PinkyDip, R::PinkyTip),
        }
    }
}

const ALL_FINGERS: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

#[derive(Debug, Clone)]
pub(crate) struct HandBuilder {
    set: LandmarkSet,
}

impl HandBuilder {
    pub(crate) fn neutral() -> Self {
        let layout: [(f64, f64); 21] = [
            (0.50, 0.90), // wrist
            (0.40, 0.85),
            (0.35, 0.80),
            (0.30, 0.75),
            (0.25, 0.75), // thumb tip
            (0.45, 0.70),
            (0.45, 0.60),
            (0.45, 0.60),
            (0.45, 0.60), // index tip
            (0.51, 0.70),
            (0.51, 0.60),
            (0.51, 0.60),
            (0.51, 0.60), // middle tip
            (0.57, 0.70),
            (0.57, 0.60),
            (0.57, 0.60),
            (0.57, 0.60), // ring tip
            (0.63, 0.72),
            (0.63, 0.62),
            (0.63, 0.62),
            (0.63, 0.62), // pinky tip
        ];
        let points = layout.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect();
        Self {
            set: LandmarkSet::new(points),
        }
    }

    pub(crate) fn open_palm() -> Self {
        ALL_FINGERS.iter().fold(Self::neutral(), |b, &f| b.raise(f))
    }

    pub(crate) fn fist() -> Self {
        ALL_FINGERS.iter().fold(Self::neutral(), |b, &f| b.fold(f))
    }

    pub(crate) fn from_set(set: LandmarkSet) -> Self {
        Self { set }
    }

    fn point(&self, role: R) -> Point3 {
        self.set.get(role).copied().unwrap_or_default()
    }

    fn shift_finger(mut self, finger: Finger, dy: f64) -> Self {
        let (pip, dip, tip) = finger.joints();
        let base = self.point(pip);
        let mut mid = self.point(dip);
        mid.y = base.y + dy / 2.0;
        let mut end = self.point(tip);
        end.y = base.y + dy;
        self.set.set(dip, mid);
        self.set.set(tip, end);
        self
    }

    /// Tip 0.12 above the PIP
    pub(crate) fn raise(self, finger: Finger) -> Self {
        self.shift_finger(finger, -0.12)
    }

    /// Tip 0.12 below the PIP
    pub(crate) fn fold(self, finger: Finger) -> Self {
        self.shift_finger(finger, 0.12)
    }

    pub(crate) fn fold_thumb(mut self) -> Self {
        let ip = self.point(R::ThumbIp);
        let mut tip = self.point(R::ThumbTip);
        tip.y = ip.y + 0.1;
        self.set.set(R::ThumbTip, tip);
        self
    }

    pub(crate) fn at(self, role: R, x: f64, y: f64) -> Self {
        let z = self.point(role).z;
        self.at_z(role, x, y, z)
    }

    pub(crate) fn at_z(mut self, role: R, x: f64, y: f64, z: f64) -> Self {
        self.set.set(role, Point3::new(x, y, z));
        self
    }

    /// Thumb tip just beside the index tip
    pub(crate) fn pinch(self) -> Self {
        let tip = self.point(R::IndexFingerTip);
        self.at(R::ThumbTip, tip.x - 0.01, tip.y)
    }

    /// Thumb tip just beside the middle tip
    pub(crate) fn middle_tap(self) -> Self {
        let tip = self.point(R::MiddleFingerTip);
        self.at(R::ThumbTip, tip.x + 0.01, tip.y)
    }

    /// Middle tip 0.2 to the right of the index tip
    pub(crate) fn spread(self) -> Self {
        let tip = self.point(R::IndexFingerTip);
        let middle = self.point(R::MiddleFingerTip);
        self.at(R::MiddleFingerTip, tip.x + 0.2, middle.y)
    }

    /// Middle tip 0.02 to the right of the index tip
    pub(crate) fn together(self) -> Self {
        let tip = self.point(R::IndexFingerTip);
        let middle = self.point(R::MiddleFingerTip);
        self.at(R::MiddleFingerTip, tip.x + 0.02, middle.y)
    }

    pub(crate) fn wrist_at(self, x: f64, y: f64) -> Self {
        self.at(R::Wrist, x, y)
    }

    pub(crate) fn knuckles_z(mut self, z: f64) -> Self {
        for role in [R::IndexFingerMcp, R::MiddleFingerMcp, R::RingFingerMcp] {
            let mut p = self.point(role);
            p.z = z;
            self.set.set(role, p);
        }
        self
    }

    pub(crate) fn build(self) -> LandmarkSet {
        self.set
    }

    pub(crate) fn hand(self, handedness: Handedness) -> HandObservation {
        HandObservation::new(handedness, self.set)
    }
}

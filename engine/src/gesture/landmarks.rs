//! Hand landmark data model and the frame summarizer.
//!
//! The upstream detector delivers 21 normalized 2D points per hand in the
//! MediaPipe layout.  Every classifier only looks at six of them (wrist and
//! the five fingertips), so each raw hand is reduced to a `HandObservation`
//! once per call.

use tracing::debug;

// ── Landmark layout ────────────────────────────────────────

/// The 21 landmarks produced by the hand-pose model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

// ── Handedness ─────────────────────────────────────────────

/// Which hand the detector says this is.
///
/// Ordered Left before Right; two-hand pairing relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a detector label.  Case-insensitive ("Right", "right").
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("left") {
            Some(Self::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Some(Self::Right)
        } else {
            None
        }
    }
}

// ── Points ─────────────────────────────────────────────────

/// A 2D landmark position, each axis normalized to [0,1] of the camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
}

impl LandmarkPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &LandmarkPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Move `t` of the way from `self` towards `other`.
    pub fn lerp(&self, other: &LandmarkPoint, t: f32) -> LandmarkPoint {
        LandmarkPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ── Raw input / summarized output ──────────────────────────

/// One hand as delivered by the upstream detector.
#[derive(Debug, Clone)]
pub struct RawHand {
    pub handedness: Handedness,
    /// Expected to hold exactly `LANDMARK_COUNT` points.
    pub landmarks: Vec<LandmarkPoint>,
}

/// Identity used to correlate a hand across consecutive frames.
///
/// Slot-based, not biometric: if the detector reorders hands the key
/// silently moves to the other hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandKey {
    pub handedness: Handedness,
    pub slot: usize,
}

/// The six semantic points of one hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub handedness: Handedness,
    /// Position of this hand in the input sequence of its frame.
    pub slot: usize,
    pub thumb_tip: LandmarkPoint,
    pub index_tip: LandmarkPoint,
    pub middle_tip: LandmarkPoint,
    pub ring_tip: LandmarkPoint,
    pub pinky_tip: LandmarkPoint,
    pub wrist: LandmarkPoint,
}

impl HandObservation {
    pub fn key(&self) -> HandKey {
        HandKey {
            handedness: self.handedness,
            slot: self.slot,
        }
    }

    /// Thumb tip to index tip.
    pub fn thumb_index_distance(&self) -> f32 {
        self.thumb_tip.distance(&self.index_tip)
    }

    /// Index tip to middle tip.
    pub fn index_middle_distance(&self) -> f32 {
        self.index_tip.distance(&self.middle_tip)
    }

    /// Thumb tip to middle tip.
    pub fn thumb_middle_distance(&self) -> f32 {
        self.thumb_tip.distance(&self.middle_tip)
    }
}

/// Reduce each raw hand to its six semantic points.
///
/// `slot` is the hand's position in `hands`.  A hand with the wrong number
/// of landmarks, or with non-finite coordinates, is skipped; the remaining
/// hands keep their input positions as slots.
pub fn summarize(hands: &[RawHand]) -> Vec<HandObservation> {
    hands
        .iter()
        .enumerate()
        .filter_map(|(slot, raw)| summarize_hand(slot, raw))
        .collect()
}

fn summarize_hand(slot: usize, raw: &RawHand) -> Option<HandObservation> {
    if raw.landmarks.len() != LANDMARK_COUNT {
        debug!(
            "Summarizer: expected {} landmarks, got {} for {:?} hand in slot {}",
            LANDMARK_COUNT,
            raw.landmarks.len(),
            raw.handedness,
            slot,
        );
        return None;
    }
    if !raw.landmarks.iter().all(LandmarkPoint::is_finite) {
        debug!(
            "Summarizer: non-finite landmark for {:?} hand in slot {}",
            raw.handedness, slot,
        );
        return None;
    }

    let at = |lm: HandLandmark| raw.landmarks[lm.index()];
    Some(HandObservation {
        handedness: raw.handedness,
        slot,
        thumb_tip: at(HandLandmark::ThumbTip),
        index_tip: at(HandLandmark::IndexTip),
        middle_tip: at(HandLandmark::MiddleTip),
        ring_tip: at(HandLandmark::RingTip),
        pinky_tip: at(HandLandmark::PinkyTip),
        wrist: at(HandLandmark::Wrist),
    })
}

// ── Test helpers ───────────────────────────────────────────

/// Build a raw hand with every landmark at the wrist, then place the
/// thumb, index and middle tips.  Ring and pinky sit well away from
/// everything.
#[cfg(test)]
pub(crate) fn raw_hand(
    handedness: Handedness,
    wrist: (f32, f32),
    thumb: (f32, f32),
    index: (f32, f32),
    middle: (f32, f32),
) -> RawHand {
    let mut landmarks = vec![LandmarkPoint::new(wrist.0, wrist.1); LANDMARK_COUNT];
    landmarks[HandLandmark::ThumbTip.index()] = LandmarkPoint::new(thumb.0, thumb.1);
    landmarks[HandLandmark::IndexTip.index()] = LandmarkPoint::new(index.0, index.1);
    landmarks[HandLandmark::MiddleTip.index()] = LandmarkPoint::new(middle.0, middle.1);
    landmarks[HandLandmark::RingTip.index()] = LandmarkPoint::new(wrist.0 + 0.2, wrist.1 - 0.2);
    landmarks[HandLandmark::PinkyTip.index()] = LandmarkPoint::new(wrist.0 + 0.25, wrist.1 - 0.15);
    RawHand {
        handedness,
        landmarks,
    }
}

// ── Tests ──────────────────────────────────────────────────

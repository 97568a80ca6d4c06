//! Relationships between two concurrently tracked hands: zoom, rotate and
//! proximity lock.

use std::f32::consts::{PI, TAU};

use super::config::EngineConfig;
use super::event::{EventHand, GestureEvent, GestureKind};
use super::history::HistoryBuffer;
use super::landmarks::HandObservation;

/// Index-tip separation change per call that zooms.
pub const ZOOM_DELTA: f32 = 0.02;
/// Minimum angle (radians) between the two index directions for `rotate`.
pub const ROTATE_MIN_ANGLE: f32 = 0.3;
/// Wrists closer than this lock the screen.
pub const LOCK_DISTANCE: f32 = 0.08;

/// Pick the two hands to compare: sorted by handedness (Left first), then
/// slot.  Extra hands beyond the first two are ignored.
pub fn canonical_pair(hands: &[HandObservation]) -> Option<(&HandObservation, &HandObservation)> {
    if hands.len() < 2 {
        return None;
    }
    let mut sorted: Vec<&HandObservation> = hands.iter().collect();
    sorted.sort_by_key(|h| h.key());
    Some((sorted[0], sorted[1]))
}

/// Append two-hand candidate events for the latest buffered frame.
pub fn classify(history: &HistoryBuffer, config: &EngineConfig, out: &mut Vec<GestureEvent>) {
    let Some(current) = history.latest() else {
        return;
    };
    let Some((a, b)) = canonical_pair(&current.hands) else {
        return;
    };

    // Zoom: both hands pinching, index tips moving apart or together
    if a.thumb_index_distance() < config.pinch_threshold
        && b.thumb_index_distance() < config.pinch_threshold
    {
        let prev_pair = history
            .previous()
            .and_then(|prev| Some((prev.hand(a.key())?, prev.hand(b.key())?)));
        if let Some((pa, pb)) = prev_pair {
            let prev_dist = pa.index_tip.distance(&pb.index_tip);
            let cur_dist = a.index_tip.distance(&b.index_tip);
            let delta = cur_dist - prev_dist;
            let kind = if delta > ZOOM_DELTA {
                Some(GestureKind::ZoomIn)
            } else if delta < -ZOOM_DELTA {
                Some(GestureKind::ZoomOut)
            } else {
                None
            };
            if let Some(kind) = kind {
                out.push(GestureEvent::unscored(kind, EventHand::Both).with_amount(delta));
            }
        }
    }

    // Rotate: index directions diverge
    let angle = wrap_angle(index_direction(a) - index_direction(b));
    if angle.abs() > ROTATE_MIN_ANGLE {
        out.push(GestureEvent::unscored(GestureKind::Rotate, EventHand::Both).with_angle(angle));
    }

    // Lock: wrists brought together
    let wrist_dist = a.wrist.distance(&b.wrist);
    if wrist_dist < LOCK_DISTANCE {
        out.push(GestureEvent::unscored(GestureKind::LockScreen, EventHand::Both));
    }
}

/// Angle of the wrist-to-index-tip vector.
fn index_direction(h: &HandObservation) -> f32 {
    let dx = h.index_tip.x - h.wrist.x;
    let dy = h.index_tip.y - h.wrist.y;
    dy.atan2(dx)
}

/// Wrap into (-π, π].
fn wrap_angle(a: f32) -> f32 {
    let a = a % TAU;
    if a > PI {
        a - TAU
    } else if a <= -PI {
        a + TAU
    } else {
        a
    }
}

//! Per-hand state carried across frames: pinch latches, hold timer and
//! the smoothed wrist position used for velocity.

use std::collections::HashMap;

use tracing::debug;

use super::config::EngineConfig;
use super::landmarks::{HandKey, HandObservation, LandmarkPoint};

// ── Pinch state ────────────────────────────────────────────

/// The four binary pinch signals of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinchState {
    pub thumb_index: bool,
    pub index_middle: bool,
    pub thumb_middle: bool,
    /// Thumb-index and index-middle at the same time.
    pub tap3: bool,
}

impl PinchState {
    /// Compare the hand's fingertip distances against the pinch thresholds.
    pub fn measure(obs: &HandObservation, config: &EngineConfig) -> Self {
        let thumb_index = obs.thumb_index_distance() < config.pinch_threshold;
        let index_middle = obs.index_middle_distance() < config.two_finger_threshold;
        let thumb_middle = obs.thumb_middle_distance() < config.pinch_threshold;
        Self {
            thumb_index,
            index_middle,
            thumb_middle,
            tap3: thumb_index && index_middle,
        }
    }
}

/// Per-call wrist displacement (not divided by elapsed time).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

// ── Tracked hand ───────────────────────────────────────────

/// Everything remembered about one `HandKey`.
#[derive(Debug, Clone)]
pub struct HandTrackState {
    /// Pinch signals as of the last call that saw this hand.
    pub latches: PinchState,
    /// Set when thumb-index goes down, cleared when it comes up.
    pub hold_started_at: Option<f64>,
    pub smoothed_wrist: LandmarkPoint,
    pub last_seen: f64,
}

impl HandTrackState {
    fn new(wrist: LandmarkPoint, now: f64) -> Self {
        Self {
            latches: PinchState::default(),
            hold_started_at: None,
            smoothed_wrist: wrist,
            last_seen: now,
        }
    }
}

/// What the classifiers need to know after a hand has been observed.
#[derive(Debug, Clone, Copy)]
pub struct HandUpdate {
    /// Latches before this call; rising edges compare against these.
    pub previous: PinchState,
    pub current: PinchState,
    /// Seconds thumb-index has been held down, if it is down.
    pub hold_elapsed_s: Option<f64>,
    pub velocity: Velocity,
}

impl HandUpdate {
    pub fn rising_thumb_index(&self) -> bool {
        self.current.thumb_index && !self.previous.thumb_index
    }

    pub fn rising_index_middle(&self) -> bool {
        self.current.index_middle && !self.previous.index_middle
    }

    pub fn rising_thumb_middle(&self) -> bool {
        self.current.thumb_middle && !self.previous.thumb_middle
    }

    pub fn rising_tap3(&self) -> bool {
        self.current.tap3 && !self.previous.tap3
    }

    /// Whether thumb-index has been held for at least `hold_s`.
    pub fn held_for(&self, hold_s: f64) -> bool {
        self.hold_elapsed_s.is_some_and(|t| t >= hold_s)
    }
}

// ── Tracker ────────────────────────────────────────────────

/// Owns the state of every tracked hand.
#[derive(Debug, Default)]
pub struct HandTracker {
    hands: HashMap<HandKey, HandTrackState>,
}

impl HandTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the hand's state.
    ///
    /// `in_previous_frame` says whether the previous buffered frame held the
    /// same key.  Without it there is nothing to take a delta against, so
    /// velocity is zero and the wrist filter restarts from the raw sample.
    pub fn observe(
        &mut self,
        obs: &HandObservation,
        now: f64,
        in_previous_frame: bool,
        config: &EngineConfig,
    ) -> HandUpdate {
        let current = PinchState::measure(obs, config);
        let state = self
            .hands
            .entry(obs.key())
            .or_insert_with(|| HandTrackState::new(obs.wrist, now));
        let previous = state.latches;

        if current.thumb_index {
            if !previous.thumb_index || state.hold_started_at.is_none() {
                state.hold_started_at = Some(now);
            }
        } else {
            state.hold_started_at = None;
        }

        let velocity = if in_previous_frame {
            let prev = state.smoothed_wrist;
            let smoothed = prev.lerp(&obs.wrist, config.smoothing_factor);
            state.smoothed_wrist = smoothed;
            Velocity {
                dx: smoothed.x - prev.x,
                dy: smoothed.y - prev.y,
            }
        } else {
            state.smoothed_wrist = obs.wrist;
            Velocity::default()
        };

        state.latches = current;
        state.last_seen = now;

        HandUpdate {
            previous,
            current,
            hold_elapsed_s: state.hold_started_at.map(|t| (now - t).max(0.0)),
            velocity,
        }
    }

    /// Drop every hand not seen for more than `ttl_s`.  Returns how many
    /// were dropped.
    pub fn evict_stale(&mut self, now: f64, ttl_s: f64) -> usize {
        let before = self.hands.len();
        self.hands.retain(|key, state| {
            let keep = now - state.last_seen <= ttl_s;
            if !keep {
                debug!(
                    "Evicting {:?} hand slot {} (unseen for {:.2}s)",
                    key.handedness,
                    key.slot,
                    now - state.last_seen,
                );
            }
            keep
        });
        before - self.hands.len()
    }

    pub fn get(&self, key: HandKey) -> Option<&HandTrackState> {
        self.hands.get(&key)
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Tracked hands sorted by key.
    pub fn sorted(&self) -> Vec<(HandKey, &HandTrackState)> {
        let mut v: Vec<_> = self.hands.iter().map(|(k, s)| (*k, s)).collect();
        v.sort_by_key(|(k, _)| *k);
        v
    }

    pub fn clear(&mut self) {
        self.hands.clear();
    }
}

//! The per-call pipeline: summarize, buffer, classify, gate.

use tracing::{debug, warn};

use super::config::EngineConfig;
use super::cooldown::CooldownFilter;
use super::event::GestureEvent;
use super::history::{FrameSnapshot, HistoryBuffer};
use super::landmarks::{summarize, HandKey, RawHand};
use super::single_hand;
use super::tracker::{HandTrackState, HandTracker};
use super::two_hand;

/// Stateful gesture classifier.  One instance per landmark stream; not
/// shareable across concurrent callers without external locking.
pub struct GestureEngine {
    config: EngineConfig,
    history: HistoryBuffer,
    tracker: HandTracker,
    cooldown: CooldownFilter,
    last_timestamp: Option<f64>,
}

impl GestureEngine {
    /// Create an engine with fresh state.
    ///
    /// The config is trusted: a config that fails validation is logged and
    /// used as is.  Use [`GestureEngine::try_new`] to reject it instead.
    pub fn new(config: EngineConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!("Engine config failed validation, using it anyway: {:#}", e);
        }
        Self {
            history: HistoryBuffer::new(config.buffer_len),
            tracker: HandTracker::new(),
            cooldown: CooldownFilter::new(),
            last_timestamp: None,
            config,
        }
    }

    /// Create an engine, rejecting a config that fails validation.
    pub fn try_new(config: EngineConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify one frame of detector output taken at `now` (seconds).
    ///
    /// Calls are expected in non-decreasing time order at a roughly
    /// constant rate; velocity thresholds are per call, not per second.
    /// A call without any valid hand returns nothing and leaves tracked
    /// hand state and cooldown clocks alone.
    pub fn classify(&mut self, now: f64, hands: &[RawHand]) -> Vec<GestureEvent> {
        if let Some(last) = self.last_timestamp {
            if now < last {
                warn!("Timestamp went backwards: {:.3}s after {:.3}s", now, last);
            }
        }
        self.last_timestamp = Some(now);

        let observations = summarize(hands);
        let empty = observations.is_empty();
        self.history.push(FrameSnapshot {
            timestamp: now,
            hands: observations,
        });
        if empty {
            return Vec::new();
        }

        self.tracker.evict_stale(now, self.config.track_ttl_s);

        let Self {
            config,
            history,
            tracker,
            cooldown,
            ..
        } = self;
        let history = &*history;
        let Some(current) = history.latest() else {
            return Vec::new();
        };
        let previous = history.previous();

        let mut candidates = Vec::new();
        for obs in &current.hands {
            let in_previous_frame = previous.is_some_and(|p| p.hand(obs.key()).is_some());
            let update = tracker.observe(obs, now, in_previous_frame, config);
            single_hand::classify(obs, &update, history, config, &mut candidates);
        }
        two_hand::classify(history, config, &mut candidates);

        let events = cooldown.filter(
            now,
            candidates,
            config.confidence_threshold,
            config.cooldown_s,
        );
        for e in &events {
            debug!(
                "Gesture: {} ({}) confidence={:.2}",
                e.kind.as_str(),
                e.hand.as_str(),
                e.confidence,
            );
        }
        events
    }

    /// Tracked state for one hand, if it is currently tracked.
    pub fn hand_state(&self, key: HandKey) -> Option<&HandTrackState> {
        self.tracker.get(key)
    }

    pub fn tracked_hands(&self) -> usize {
        self.tracker.len()
    }

    pub fn buffered_frames(&self) -> usize {
        self.history.len()
    }

    /// Forget all history, tracked hands and cooldown clocks.
    pub fn reset(&mut self) {
        self.history.clear();
        self.tracker.clear();
        self.cooldown.clear();
        self.last_timestamp = None;
    }

    /// Generate s-expression for status reporting.
    pub fn status_sexp(&self) -> String {
        let hands = self.tracker.sorted();
        let hands_sexp = if hands.is_empty() {
            "nil".to_string()
        } else {
            let mut s = String::from("(");
            for (i, (key, state)) in hands.iter().enumerate() {
                if i > 0 {
                    s.push(' ');
                }
                let hold = state
                    .hold_started_at
                    .zip(self.last_timestamp)
                    .map(|(start, now)| format!("{:.2}", now - start))
                    .unwrap_or_else(|| "nil".to_string());
                s.push_str(&format!(
                    "(:hand :{} :slot {} :pinch-ti {} :pinch-im {} :pinch-tm {} :tap3 {} :hold-s {})",
                    key.handedness.as_str(),
                    key.slot,
                    sexp_bool(state.latches.thumb_index),
                    sexp_bool(state.latches.index_middle),
                    sexp_bool(state.latches.thumb_middle),
                    sexp_bool(state.latches.tap3),
                    hold,
                ));
            }
            s.push(')');
            s
        };
        format!(
            "(:frames {} :capacity {} :tracked-hands {} :hands {})",
            self.history.len(),
            self.history.capacity(),
            self.tracker.len(),
            hands_sexp,
        )
    }
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn sexp_bool(b: bool) -> &'static str {
    if b {
        "t"
    } else {
        "nil"
    }
}

// ── Test helpers ───────────────────────────────────────────

/// An open hand pointing straight up: no pair of fingertips is pinched.
#[cfg(test)]
fn open_hand(handedness: super::landmarks::Handedness, x: f32) -> RawHand {
    super::landmarks::raw_hand(
        handedness,
        (x, 0.8),
        (x - 0.15, 0.6),
        (x, 0.5),
        (x + 0.15, 0.55),
    )
}

/// Thumb-index pinched hand pointing straight up.
#[cfg(test)]
fn pinched_hand(handedness: super::landmarks::Handedness, x: f32) -> RawHand {
    super::landmarks::raw_hand(
        handedness,
        (x, 0.8),
        (x - 0.01, 0.5),
        (x, 0.5),
        (x + 0.2, 0.5),
    )
}

// ── Tests ──────────────────────────────────────────────────

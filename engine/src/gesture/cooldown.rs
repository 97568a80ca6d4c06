//! Final gate over the candidate events of one call: confidence threshold,
//! then a minimum re-emission interval per event type.

use std::collections::HashMap;

use tracing::debug;

use super::event::{GestureEvent, GestureKind};

/// Last emission time per event type.  Shared across hands and across the
/// single- and two-hand classifiers.
#[derive(Debug, Default)]
pub struct CooldownFilter {
    last_emitted: HashMap<GestureKind, f64>,
}

impl CooldownFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the candidates that clear `min_confidence` and whose type was
    /// last emitted more than `cooldown_s` before `now`.
    pub fn filter(
        &mut self,
        now: f64,
        candidates: Vec<GestureEvent>,
        min_confidence: f32,
        cooldown_s: f64,
    ) -> Vec<GestureEvent> {
        let mut emitted = Vec::with_capacity(candidates.len());
        for event in candidates {
            if event.confidence < min_confidence {
                debug!(
                    "Dropping {} ({}): confidence {:.2} < {:.2}",
                    event.kind.as_str(),
                    event.hand.as_str(),
                    event.confidence,
                    min_confidence,
                );
                continue;
            }
            if let Some(&last) = self.last_emitted.get(&event.kind) {
                if now - last <= cooldown_s {
                    debug!(
                        "Suppressing {} ({}): {:.3}s since last emission",
                        event.kind.as_str(),
                        event.hand.as_str(),
                        now - last,
                    );
                    continue;
                }
            }
            self.last_emitted.insert(event.kind, now);
            emitted.push(event);
        }
        emitted
    }

    /// When `kind` was last let through, if ever.
    pub fn last_emitted(&self, kind: GestureKind) -> Option<f64> {
        self.last_emitted.get(&kind).copied()
    }

    pub fn clear(&mut self) {
        self.last_emitted.clear();
    }
}

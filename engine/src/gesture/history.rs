//! Rolling buffer of recent summarized frames.

use std::collections::VecDeque;

use super::landmarks::{HandKey, HandObservation};

/// All summarized hands of one update call.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Caller-supplied time of the call, in seconds.
    pub timestamp: f64,
    pub hands: Vec<HandObservation>,
}

impl FrameSnapshot {
    /// Look up a hand by key.
    pub fn hand(&self, key: HandKey) -> Option<&HandObservation> {
        self.hands.iter().find(|h| h.key() == key)
    }
}

/// Bounded history of frames in arrival order.  The oldest frame is
/// evicted once `capacity` is exceeded.
#[derive(Debug)]
pub struct HistoryBuffer {
    frames: VecDeque<FrameSnapshot>,
    capacity: usize,
}

impl HistoryBuffer {
    /// A capacity of zero is raised to one so the latest frame is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, frame: FrameSnapshot) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The frame appended by the current call.
    pub fn latest(&self) -> Option<&FrameSnapshot> {
        self.frames.back()
    }

    /// The frame appended by the call before the current one.
    pub fn previous(&self) -> Option<&FrameSnapshot> {
        let n = self.frames.len();
        if n < 2 {
            return None;
        }
        self.frames.get(n - 2)
    }

    /// The last `n` frames, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &FrameSnapshot> {
        let skip = self.frames.len().saturating_sub(n);
        self.frames.iter().skip(skip)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

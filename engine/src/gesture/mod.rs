//! Gesture classification engine.
//!
//! Turns per-frame hand landmarks from an external detector into a
//! filtered, rate-limited stream of named control events.  Per call:
//! `landmarks` summarizes each hand, `history` buffers the frame,
//! `single_hand` and `two_hand` propose candidates using `tracker` state,
//! and `cooldown` decides what is emitted.

pub mod config;
pub mod cooldown;
pub mod engine;
pub mod event;
pub mod history;
pub mod landmarks;
pub mod single_hand;
pub mod tracker;
pub mod two_hand;

pub use config::EngineConfig;
pub use engine::GestureEngine;
pub use event::{EventHand, GestureEvent, GestureKind};
pub use landmarks::{HandKey, Handedness, LandmarkPoint, RawHand, LANDMARK_COUNT};

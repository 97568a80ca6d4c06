//! AirTouch gesture engine: hand landmarks in, debounced control events out.

pub mod gesture;
pub mod replay;

//! Gesture events and confidence helpers.

use super::landmarks::Handedness;

// ── Event types ────────────────────────────────────────────

/// Every control event the engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    // Right hand
    LeftClick,
    RightClick,
    MiddleClick,
    Drag,
    ScrollUp,
    ScrollDown,
    HScrollLeft,
    HScrollRight,
    Screenshot,
    AppSwitch,
    TaskView,
    ShowDesktop,
    // Left hand
    VolumeUp,
    VolumeDown,
    MuteUnmute,
    BrightnessUp,
    BrightnessDown,
    NextTrack,
    PrevTrack,
    ModifierHold,
    // Both hands
    ZoomIn,
    ZoomOut,
    Rotate,
    LockScreen,
}

impl GestureKind {
    /// Name used by the downstream action mapper.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftClick => "left_click",
            Self::RightClick => "right_click",
            Self::MiddleClick => "middle_click",
            Self::Drag => "drag",
            Self::ScrollUp => "scroll_up",
            Self::ScrollDown => "scroll_down",
            Self::HScrollLeft => "hscroll_left",
            Self::HScrollRight => "hscroll_right",
            Self::Screenshot => "screenshot",
            Self::AppSwitch => "app_switch",
            Self::TaskView => "task_view",
            Self::ShowDesktop => "show_desktop",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::MuteUnmute => "mute_unmute",
            Self::BrightnessUp => "brightness_up",
            Self::BrightnessDown => "brightness_down",
            Self::NextTrack => "next_track",
            Self::PrevTrack => "prev_track",
            Self::ModifierHold => "modifier_hold",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::Rotate => "rotate",
            Self::LockScreen => "lock_screen",
        }
    }
}

/// Which hand (or pair) produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventHand {
    Left,
    Right,
    Both,
}

impl EventHand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

impl From<Handedness> for EventHand {
    fn from(h: Handedness) -> Self {
        match h {
            Handedness::Left => Self::Left,
            Handedness::Right => Self::Right,
        }
    }
}

// ── Event ──────────────────────────────────────────────────

/// One emitted control event.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub hand: EventHand,
    /// Always within [0,1].
    pub confidence: f32,
    /// Signed per-call displacement for scroll and zoom events.
    pub amount: Option<f32>,
    /// Signed angle in radians for `rotate`.
    pub angle: Option<f32>,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, hand: EventHand, confidence: f32) -> Self {
        Self {
            kind,
            hand,
            confidence: clamp01(confidence),
            amount: None,
            angle: None,
        }
    }

    /// An event whose trigger carries no graded score.  Always clears the
    /// confidence gate.
    pub fn unscored(kind: GestureKind, hand: EventHand) -> Self {
        Self::new(kind, hand, UNSCORED)
    }

    pub fn with_amount(mut self, amount: f32) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = Some(angle);
        self
    }
}

// ── Confidence ─────────────────────────────────────────────

/// Confidence of events that fire on a plain threshold crossing.
pub const UNSCORED: f32 = 1.0;

/// Clamp into [0,1].  NaN maps to 0.
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// How far below `threshold` a distance sits: 1 at zero distance, 0 at the
/// threshold and beyond.
pub fn closeness(distance: f32, threshold: f32) -> f32 {
    clamp01(1.0 - distance / threshold)
}

/// How far a signed magnitude exceeds `threshold`: 0.5 right at the
/// threshold, saturating at 1 for twice the threshold.
pub fn magnitude(value: f32, threshold: f32) -> f32 {
    clamp01(value.abs() / (2.0 * threshold))
}

//! Per-hand rule sets.
//!
//! The right hand drives the pointer (clicks, drag, scroll, tap3 swipes);
//! the left hand drives media and system controls.  Click-style events are
//! edge-triggered against the latches in `HandUpdate` and scored by how
//! deep the pinch is; motion and hold events fire unscored every call
//! their condition holds and are left to the cooldown filter.

use super::config::EngineConfig;
use super::event::{closeness, magnitude, EventHand, GestureEvent, GestureKind};
use super::history::HistoryBuffer;
use super::landmarks::{HandObservation, Handedness};
use super::tracker::HandUpdate;

/// Per-call wrist displacement above which two-finger motion scrolls.
pub const SCROLL_VELOCITY: f32 = 0.02;
/// Per-call wrist displacement above which a tap3 motion is a swipe.
pub const TAP3_SWIPE_VELOCITY: f32 = 0.06;
/// Tap3 counts as stationary below this displacement on both axes.
pub const TAP3_STILL_VELOCITY: f32 = 0.01;
/// Index-middle spread change that adjusts brightness.
pub const SPREAD_DELTA: f32 = 0.02;
/// Frames (including the current one) searched for the spread baseline.
pub const SPREAD_WINDOW: usize = 3;
/// Horizontal displacement for a left-hand track skip.
pub const TRACK_SWIPE_VELOCITY: f32 = 0.08;
/// Vertical displacement must stay below this for a track skip.
pub const TRACK_MAX_VERTICAL: f32 = 0.05;
/// Left-hand thumb-index hold time before `modifier_hold`.
pub const MODIFIER_HOLD_S: f64 = 0.5;

/// Append the candidate events for one observed hand to `out`.
pub fn classify(
    obs: &HandObservation,
    update: &HandUpdate,
    history: &HistoryBuffer,
    config: &EngineConfig,
    out: &mut Vec<GestureEvent>,
) {
    match obs.handedness {
        Handedness::Right => classify_right(obs, update, config, out),
        Handedness::Left => classify_left(obs, update, history, config, out),
    }
}

fn classify_right(
    obs: &HandObservation,
    update: &HandUpdate,
    config: &EngineConfig,
    out: &mut Vec<GestureEvent>,
) {
    let hand = EventHand::Right;
    let ti = closeness(obs.thumb_index_distance(), config.pinch_threshold);
    let im = closeness(obs.index_middle_distance(), config.two_finger_threshold);
    let tm = closeness(obs.thumb_middle_distance(), config.pinch_threshold);
    let (vx, vy) = (update.velocity.dx, update.velocity.dy);

    if update.rising_thumb_index() {
        out.push(GestureEvent::new(GestureKind::LeftClick, hand, ti));
    }
    if update.rising_index_middle() {
        out.push(GestureEvent::new(GestureKind::RightClick, hand, im));
    }
    if update.rising_thumb_middle() {
        out.push(GestureEvent::new(GestureKind::MiddleClick, hand, tm));
    }

    if update.current.thumb_index && update.held_for(config.hold_time_s) {
        out.push(GestureEvent::unscored(GestureKind::Drag, hand));
    }

    if update.current.index_middle {
        if vy.abs() > SCROLL_VELOCITY {
            // image y grows downwards
            let kind = if vy > 0.0 {
                GestureKind::ScrollDown
            } else {
                GestureKind::ScrollUp
            };
            out.push(GestureEvent::unscored(kind, hand).with_amount(vy));
        }
        if vx.abs() > SCROLL_VELOCITY {
            let kind = if vx > 0.0 {
                GestureKind::HScrollRight
            } else {
                GestureKind::HScrollLeft
            };
            out.push(GestureEvent::unscored(kind, hand).with_amount(vx));
        }
    }

    if update.current.tap3 {
        if vx.abs() > TAP3_SWIPE_VELOCITY {
            let confidence = magnitude(vx, TAP3_SWIPE_VELOCITY);
            out.push(GestureEvent::new(GestureKind::AppSwitch, hand, confidence));
        }
        if vy < -TAP3_SWIPE_VELOCITY {
            out.push(GestureEvent::unscored(GestureKind::TaskView, hand));
        }
        if vy > TAP3_SWIPE_VELOCITY {
            out.push(GestureEvent::unscored(GestureKind::ShowDesktop, hand));
        }
        if vx.abs() < TAP3_STILL_VELOCITY && vy.abs() < TAP3_STILL_VELOCITY {
            out.push(GestureEvent::unscored(GestureKind::Screenshot, hand));
        }
    }
}

fn classify_left(
    obs: &HandObservation,
    update: &HandUpdate,
    history: &HistoryBuffer,
    config: &EngineConfig,
    out: &mut Vec<GestureEvent>,
) {
    let hand = EventHand::Left;
    let ti = closeness(obs.thumb_index_distance(), config.pinch_threshold);
    let tm = closeness(obs.thumb_middle_distance(), config.pinch_threshold);
    let (vx, vy) = (update.velocity.dx, update.velocity.dy);

    if update.rising_thumb_index() {
        out.push(GestureEvent::new(GestureKind::VolumeUp, hand, ti));
    }
    if update.rising_thumb_middle() {
        out.push(GestureEvent::new(GestureKind::VolumeDown, hand, tm));
    }
    if update.rising_tap3() {
        out.push(GestureEvent::unscored(GestureKind::MuteUnmute, hand));
    }

    if let Some(delta) = spread_change(obs, history) {
        if delta > SPREAD_DELTA {
            out.push(GestureEvent::unscored(GestureKind::BrightnessUp, hand).with_amount(delta));
        } else if delta < -SPREAD_DELTA {
            out.push(GestureEvent::unscored(GestureKind::BrightnessDown, hand).with_amount(delta));
        }
    }

    if vx.abs() > TRACK_SWIPE_VELOCITY && vy.abs() < TRACK_MAX_VERTICAL {
        let kind = if vx > 0.0 {
            GestureKind::NextTrack
        } else {
            GestureKind::PrevTrack
        };
        out.push(GestureEvent::unscored(kind, hand));
    }

    if update.current.thumb_index && update.held_for(MODIFIER_HOLD_S) {
        out.push(GestureEvent::unscored(GestureKind::ModifierHold, hand));
    }
}

/// Change of index-middle spread since the oldest of the last
/// `SPREAD_WINDOW` frames that contain this hand.
fn spread_change(obs: &HandObservation, history: &HistoryBuffer) -> Option<f32> {
    let key = obs.key();
    let baseline = history
        .recent(SPREAD_WINDOW)
        .find_map(|frame| frame.hand(key))?;
    Some(obs.index_middle_distance() - baseline.index_middle_distance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::history::FrameSnapshot;
    use crate::gesture::landmarks::{raw_hand, summarize};
    use crate::gesture::tracker::{PinchState, Velocity};

    fn config() -> EngineConfig {
        EngineConfig {
            pinch_threshold: 0.05,
            two_finger_threshold: 0.05,
            ..EngineConfig::default()
        }
    }

    fn obs(
        handedness: Handedness,
        thumb: (f32, f32),
        index: (f32, f32),
        middle: (f32, f32),
    ) -> HandObservation {
        summarize(&[raw_hand(handedness, (0.5, 0.9), thumb, index, middle)])
            .pop()
            .unwrap()
    }

    fn update(previous: PinchState, current: PinchState, velocity: (f32, f32)) -> HandUpdate {
        HandUpdate {
            previous,
            current,
            hold_elapsed_s: None,
            velocity: Velocity {
                dx: velocity.0,
                dy: velocity.1,
            },
        }
    }

    fn kinds(events: &[GestureEvent]) -> Vec<GestureKind> {
        events.iter().map(|e| e.kind).collect()
    }

    fn run(o: &HandObservation, u: &HandUpdate, history: &HistoryBuffer) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        classify(o, u, history, &config(), &mut out);
        out
    }

    #[test]
    fn test_right_left_click_on_rising_edge() {
        let o = obs(Handedness::Right, (0.5, 0.5), (0.52, 0.5), (0.7, 0.5));
        let cur = PinchState::measure(&o, &config());
        let events = run(&o, &update(PinchState::default(), cur, (0.0, 0.0)), &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::LeftClick], "got {:?}", events);
        assert!((events[0].confidence - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_right_no_click_when_steady() {
        let o = obs(Handedness::Right, (0.5, 0.5), (0.52, 0.5), (0.7, 0.5));
        let cur = PinchState::measure(&o, &config());
        let events = run(&o, &update(cur, cur, (0.0, 0.0)), &HistoryBuffer::new(8));
        assert!(events.is_empty(), "got {:?}", events);
    }

    #[test]
    fn test_right_click_and_middle_click() {
        // index-middle pinched only
        let o = obs(Handedness::Right, (0.3, 0.5), (0.5, 0.5), (0.52, 0.5));
        let cur = PinchState::measure(&o, &config());
        let events = run(&o, &update(PinchState::default(), cur, (0.0, 0.0)), &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::RightClick]);

        // thumb-middle pinched only
        let o = obs(Handedness::Right, (0.5, 0.5), (0.7, 0.5), (0.51, 0.5));
        let cur = PinchState::measure(&o, &config());
        let events = run(&o, &update(PinchState::default(), cur, (0.0, 0.0)), &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::MiddleClick]);
    }

    #[test]
    fn test_right_drag_after_hold() {
        let o = obs(Handedness::Right, (0.5, 0.5), (0.52, 0.5), (0.7, 0.5));
        let cur = PinchState::measure(&o, &config());
        let mut u = update(cur, cur, (0.0, 0.0));
        u.hold_elapsed_s = Some(0.2);
        assert!(run(&o, &u, &HistoryBuffer::new(8)).is_empty());
        u.hold_elapsed_s = Some(0.4);
        let events = run(&o, &u, &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::Drag]);
        assert_eq!(events[0].confidence, 1.0);
    }

    #[test]
    fn test_right_scroll_direction_and_amount() {
        let o = obs(Handedness::Right, (0.3, 0.5), (0.5, 0.5), (0.52, 0.5));
        let cur = PinchState::measure(&o, &config());

        let events = run(&o, &update(cur, cur, (0.0, 0.03)), &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::ScrollDown]);
        assert_eq!(events[0].amount, Some(0.03));

        let events = run(&o, &update(cur, cur, (-0.03, -0.03)), &HistoryBuffer::new(8));
        assert_eq!(
            kinds(&events),
            vec![GestureKind::ScrollUp, GestureKind::HScrollLeft]
        );
    }

    #[test]
    fn test_right_tap3_swipes_and_screenshot() {
        let o = obs(Handedness::Right, (0.50, 0.5), (0.51, 0.5), (0.52, 0.5));
        let cur = PinchState::measure(&o, &config());
        assert!(cur.tap3);

        let events = run(&o, &update(cur, cur, (0.0, 0.0)), &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::Screenshot]);

        let events = run(&o, &update(cur, cur, (0.0, -0.08)), &HistoryBuffer::new(8));
        assert!(kinds(&events).contains(&GestureKind::TaskView), "got {:?}", events);
        assert!(!kinds(&events).contains(&GestureKind::Screenshot));

        let events = run(&o, &update(cur, cur, (0.0, 0.08)), &HistoryBuffer::new(8));
        assert!(kinds(&events).contains(&GestureKind::ShowDesktop));

        let events = run(&o, &update(cur, cur, (0.09, 0.0)), &HistoryBuffer::new(8));
        let app = events.iter().find(|e| e.kind == GestureKind::AppSwitch);
        assert!(app.is_some(), "got {:?}", events);
        assert!((app.unwrap().confidence - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_left_volume_and_mute() {
        let o = obs(Handedness::Left, (0.5, 0.5), (0.52, 0.5), (0.7, 0.5));
        let cur = PinchState::measure(&o, &config());
        let events = run(&o, &update(PinchState::default(), cur, (0.0, 0.0)), &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::VolumeUp]);

        let o = obs(Handedness::Left, (0.50, 0.5), (0.51, 0.5), (0.52, 0.5));
        let cur = PinchState::measure(&o, &config());
        let events = run(&o, &update(PinchState::default(), cur, (0.0, 0.0)), &HistoryBuffer::new(8));
        let k = kinds(&events);
        assert!(k.contains(&GestureKind::VolumeUp));
        assert!(k.contains(&GestureKind::VolumeDown));
        assert!(k.contains(&GestureKind::MuteUnmute));
    }

    #[test]
    fn test_left_mute_unscored_at_shallow_tap3() {
        // both pairs just inside their thresholds
        let o = obs(Handedness::Left, (0.5, 0.5), (0.545, 0.5), (0.593, 0.5));
        let cur = PinchState::measure(&o, &config());
        assert!(cur.tap3);
        let events = run(&o, &update(PinchState::default(), cur, (0.0, 0.0)), &HistoryBuffer::new(8));
        let mute = events.iter().find(|e| e.kind == GestureKind::MuteUnmute);
        assert!(mute.is_some(), "got {:?}", events);
        assert_eq!(mute.unwrap().confidence, 1.0);
        let volume = events.iter().find(|e| e.kind == GestureKind::VolumeUp).unwrap();
        assert!(volume.confidence < 0.2, "edge score stays graded: {:?}", volume);
    }

    #[test]
    fn test_left_brightness_from_spread() {
        let narrow = obs(Handedness::Left, (0.3, 0.5), (0.5, 0.5), (0.55, 0.5));
        let wide = obs(Handedness::Left, (0.3, 0.5), (0.5, 0.5), (0.60, 0.5));

        let mut history = HistoryBuffer::new(8);
        history.push(FrameSnapshot {
            timestamp: 0.0,
            hands: vec![narrow.clone()],
        });
        history.push(FrameSnapshot {
            timestamp: 0.1,
            hands: vec![wide.clone()],
        });
        let cur = PinchState::measure(&wide, &config());
        let events = run(&wide, &update(cur, cur, (0.0, 0.0)), &history);
        assert_eq!(kinds(&events), vec![GestureKind::BrightnessUp], "got {:?}", events);

        history.push(FrameSnapshot {
            timestamp: 0.2,
            hands: vec![narrow.clone()],
        });
        history.push(FrameSnapshot {
            timestamp: 0.3,
            hands: vec![narrow.clone()],
        });
        // window is now wide, narrow, narrow
        let cur = PinchState::measure(&narrow, &config());
        let events = run(&narrow, &update(cur, cur, (0.0, 0.0)), &history);
        assert_eq!(kinds(&events), vec![GestureKind::BrightnessDown], "got {:?}", events);
    }

    #[test]
    fn test_left_track_skip() {
        let o = obs(Handedness::Left, (0.3, 0.5), (0.5, 0.5), (0.7, 0.5));
        let cur = PinchState::measure(&o, &config());
        let events = run(&o, &update(cur, cur, (0.1, 0.01)), &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::NextTrack]);
        let events = run(&o, &update(cur, cur, (-0.1, 0.0)), &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::PrevTrack]);
        // too much vertical motion
        let events = run(&o, &update(cur, cur, (0.1, 0.06)), &HistoryBuffer::new(8));
        assert!(events.is_empty(), "got {:?}", events);
    }

    #[test]
    fn test_left_modifier_hold_uses_fixed_time() {
        let o = obs(Handedness::Left, (0.5, 0.5), (0.52, 0.5), (0.7, 0.5));
        let cur = PinchState::measure(&o, &config());
        let mut u = update(cur, cur, (0.0, 0.0));
        u.hold_elapsed_s = Some(0.4);
        assert!(run(&o, &u, &HistoryBuffer::new(8)).is_empty());
        u.hold_elapsed_s = Some(0.5);
        let events = run(&o, &u, &HistoryBuffer::new(8));
        assert_eq!(kinds(&events), vec![GestureKind::ModifierHold]);
    }
}

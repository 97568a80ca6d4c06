//! Recorded landmark frames as s-expressions, and events back out.
//!
//! One frame per line:
//!
//! ```text
//! (:t 0.033 :hands ((:hand :right :points (x0 y0 x1 y1 ... x20 y20))))
//! ```

use anyhow::{anyhow, bail, Context};
use lexpr::Value;

use crate::gesture::{GestureEvent, Handedness, LandmarkPoint, RawHand};

/// One parsed line of a recording.
#[derive(Debug, Clone)]
pub struct ReplayFrame {
    pub timestamp: f64,
    pub hands: Vec<RawHand>,
}

/// Whether a recording line carries no frame (blank or `;` comment).
pub fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(';')
}

/// Parse one frame line.
pub fn parse_frame(raw: &str) -> anyhow::Result<ReplayFrame> {
    let value = lexpr::from_str(raw).context("malformed s-expression")?;

    let timestamp = get_float(&value, "t").ok_or_else(|| anyhow!("missing :t"))?;
    if !timestamp.is_finite() {
        bail!("non-finite :t {timestamp}");
    }

    let mut hands = Vec::new();
    if let Some(list) = get_value(&value, "hands") {
        for (i, item) in list_items(list).into_iter().enumerate() {
            let hand = parse_hand(item).with_context(|| format!("hand {i}"))?;
            hands.push(hand);
        }
    }

    Ok(ReplayFrame { timestamp, hands })
}

fn parse_hand(value: &Value) -> anyhow::Result<RawHand> {
    let label = get_keyword(value, "hand").ok_or_else(|| anyhow!("missing :hand"))?;
    let handedness =
        Handedness::parse(&label).ok_or_else(|| anyhow!("unknown handedness {label:?}"))?;

    let points = get_value(value, "points").ok_or_else(|| anyhow!("missing :points"))?;
    let coords = flatten_list(points)
        .into_iter()
        .map(|v| match v {
            Value::Number(n) => n
                .as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| anyhow!("unrepresentable number {n}")),
            other => Err(anyhow!("expected a number in :points, got {other}")),
        })
        .collect::<anyhow::Result<Vec<f32>>>()?;
    if coords.len() % 2 != 0 {
        bail!("odd number of coordinates ({})", coords.len());
    }

    let landmarks = coords
        .chunks_exact(2)
        .map(|xy| LandmarkPoint::new(xy[0], xy[1]))
        .collect();
    Ok(RawHand {
        handedness,
        landmarks,
    })
}

/// Format an emitted event as an s-expression.
pub fn format_event(event: &GestureEvent) -> String {
    let mut s = format!(
        "(:type :event :event :{} :hand :{} :confidence {:.2}",
        event.kind.as_str(),
        event.hand.as_str(),
        event.confidence,
    );
    if let Some(amount) = event.amount {
        s.push_str(&format!(" :amount {:.3}", amount));
    }
    if let Some(angle) = event.angle {
        s.push_str(&format!(" :angle {:.3}", angle));
    }
    s.push(')');
    s
}

// ── Plist helpers ──────────────────────────────────────────

/// Find the value following `:key` in an s-expression plist.
/// Handles both `Value::Keyword("key")` and `Value::Symbol(":key")` forms.
fn get_value<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let prefixed = format!(":{}", key);
    let mut current = value;
    while let Value::Cons(pair) = current {
        let is_key = match pair.car() {
            Value::Keyword(k) => k.as_ref() == key,
            Value::Symbol(s) => s.as_ref() == prefixed,
            _ => false,
        };
        if is_key {
            return match pair.cdr() {
                Value::Cons(next) => Some(next.car()),
                _ => None,
            };
        }
        current = pair.cdr();
    }
    None
}

/// Extract a keyword-ish value from a plist as a bare string
/// (`:right` and `right` both yield "right").
fn get_keyword(value: &Value, key: &str) -> Option<String> {
    match get_value(value, key)? {
        Value::Keyword(v) => Some(v.to_string()),
        Value::Symbol(v) => {
            let s = v.to_string();
            Some(s.strip_prefix(':').unwrap_or(&s).to_string())
        }
        Value::String(v) => Some(v.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Extract a floating-point value from a plist.
fn get_float(value: &Value, key: &str) -> Option<f64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

/// Top-level elements of a proper list.
fn list_items(value: &Value) -> Vec<&Value> {
    let mut items = Vec::new();
    let mut current = value;
    while let Value::Cons(pair) = current {
        items.push(pair.car());
        current = pair.cdr();
    }
    items
}

/// Flatten a possibly nested list into its leaf values.
fn flatten_list(value: &Value) -> Vec<&Value> {
    let mut result = Vec::new();
    fn walk<'a>(v: &'a Value, out: &mut Vec<&'a Value>) {
        match v {
            Value::Cons(pair) => {
                walk(pair.car(), out);
                walk(pair.cdr(), out);
            }
            Value::Null => {} // end of list
            other => out.push(other),
        }
    }
    walk(value, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{EventHand, GestureKind, LANDMARK_COUNT};

    fn points(n: usize) -> String {
        (0..n)
            .map(|i| format!("{:.2} {:.2}", i as f32 * 0.01, 0.5))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_parse_frame_two_hands() {
        let line = format!(
            "(:t 0.5 :hands ((:hand :Right :points ({})) (:hand :left :points ({}))))",
            points(LANDMARK_COUNT),
            points(LANDMARK_COUNT),
        );
        let frame = parse_frame(&line).unwrap();
        assert!((frame.timestamp - 0.5).abs() < 1e-9);
        assert_eq!(frame.hands.len(), 2);
        assert_eq!(frame.hands[0].handedness, Handedness::Right);
        assert_eq!(frame.hands[1].handedness, Handedness::Left);
        assert_eq!(frame.hands[0].landmarks.len(), LANDMARK_COUNT);
        assert!((frame.hands[0].landmarks[4].x - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_parse_frame_nested_pairs() {
        let line = "(:t 1 :hands ((:hand :left :points ((0.1 0.2) (0.3 0.4)))))";
        let frame = parse_frame(line).unwrap();
        let lm = &frame.hands[0].landmarks;
        assert_eq!(lm.len(), 2);
        assert!((lm[1].y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_parse_frame_no_hands() {
        let frame = parse_frame("(:t 2.0 :hands ())").unwrap();
        assert!(frame.hands.is_empty());
        let frame = parse_frame("(:t 2.0)").unwrap();
        assert!(frame.hands.is_empty());
    }

    #[test]
    fn test_parse_frame_missing_timestamp() {
        let err = parse_frame("(:hands ())").unwrap_err();
        assert!(err.to_string().contains("missing :t"), "got: {err}");
    }

    #[test]
    fn test_parse_frame_odd_coordinates() {
        let err = parse_frame("(:t 0 :hands ((:hand :left :points (0.1 0.2 0.3))))").unwrap_err();
        assert!(format!("{err:#}").contains("odd number"), "got: {err:#}");
    }

    #[test]
    fn test_parse_frame_bad_handedness() {
        let err = parse_frame("(:t 0 :hands ((:hand :both :points (0.1 0.2))))").unwrap_err();
        assert!(format!("{err:#}").contains("unknown handedness"), "got: {err:#}");
    }

    #[test]
    fn test_parse_frame_malformed() {
        assert!(parse_frame("(:t 0 :hands").is_err());
    }

    #[test]
    fn test_is_skippable() {
        assert!(is_skippable(""));
        assert!(is_skippable("   "));
        assert!(is_skippable("; recorded 2024"));
        assert!(!is_skippable("(:t 0)"));
    }

    #[test]
    fn test_format_event() {
        let e = GestureEvent::new(GestureKind::LeftClick, EventHand::Right, 0.6);
        assert_eq!(
            format_event(&e),
            "(:type :event :event :left_click :hand :right :confidence 0.60)"
        );
        let e = GestureEvent::new(GestureKind::ScrollDown, EventHand::Right, 0.5).with_amount(0.03);
        assert!(format_event(&e).ends_with(":amount 0.030)"));
        let e = GestureEvent::new(GestureKind::Rotate, EventHand::Both, 1.0).with_angle(-0.5);
        assert!(format_event(&e).contains(":hand :both"));
        assert!(format_event(&e).ends_with(":angle -0.500)"));
    }
}

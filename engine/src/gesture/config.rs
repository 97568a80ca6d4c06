//! Engine thresholds.

use anyhow::ensure;

/// Named thresholds supplied once at engine construction.
///
/// Distances are in normalized camera units, times in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Maximum thumb-index / thumb-middle distance for a pinch.
    pub pinch_threshold: f32,
    /// Maximum index-middle distance for a two-finger pinch.
    pub two_finger_threshold: f32,
    /// Right-hand thumb-index hold time before `drag` is proposed.
    pub hold_time_s: f64,
    /// Number of frames kept in the history buffer.
    pub buffer_len: usize,
    /// Minimum interval between two emissions of the same event type.
    pub cooldown_s: f64,
    /// Scored events below this confidence are dropped.
    pub confidence_threshold: f32,
    /// EMA weight of the newest wrist sample (1.0 = no smoothing).
    pub smoothing_factor: f32,
    /// Tracked hand state unseen for longer than this is evicted.
    pub track_ttl_s: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.04,
            two_finger_threshold: 0.05,
            hold_time_s: 0.35,
            buffer_len: 8,
            cooldown_s: 0.25,
            confidence_threshold: 0.25,
            smoothing_factor: 0.7,
            track_ttl_s: 1.0,
        }
    }
}

impl EngineConfig {
    /// Check that every threshold is usable.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.pinch_threshold.is_finite() && self.pinch_threshold > 0.0,
            "pinch threshold must be positive, got {}",
            self.pinch_threshold
        );
        ensure!(
            self.two_finger_threshold.is_finite() && self.two_finger_threshold > 0.0,
            "two-finger threshold must be positive, got {}",
            self.two_finger_threshold
        );
        ensure!(
            self.hold_time_s.is_finite() && self.hold_time_s > 0.0,
            "hold time must be positive, got {}",
            self.hold_time_s
        );
        ensure!(
            self.buffer_len >= 2,
            "buffer length must be at least 2 frames, got {}",
            self.buffer_len
        );
        ensure!(
            self.cooldown_s.is_finite() && self.cooldown_s >= 0.0,
            "cooldown must be non-negative, got {}",
            self.cooldown_s
        );
        ensure!(
            (0.0..=1.0).contains(&self.confidence_threshold),
            "confidence threshold must be within [0, 1], got {}",
            self.confidence_threshold
        );
        ensure!(
            self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0,
            "smoothing factor must be within (0, 1], got {}",
            self.smoothing_factor
        );
        ensure!(
            self.track_ttl_s.is_finite() && self.track_ttl_s > 0.0,
            "track TTL must be positive, got {}",
            self.track_ttl_s
        );
        Ok(())
    }

    /// Generate s-expression describing the configuration.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:pinch-threshold {:.3} :two-finger-threshold {:.3} :hold-time-s {:.2} :buffer-len {} :cooldown-s {:.2} :confidence-threshold {:.2} :smoothing-factor {:.2} :track-ttl-s {:.2})",
            self.pinch_threshold,
            self.two_finger_threshold,
            self.hold_time_s,
            self.buffer_len,
            self.cooldown_s,
            self.confidence_threshold,
            self.smoothing_factor,
            self.track_ttl_s,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_short_buffer() {
        let config = EngineConfig {
            buffer_len: 1,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("buffer length"), "got: {err}");
    }

    #[test]
    fn test_rejects_zero_smoothing() {
        let config = EngineConfig {
            smoothing_factor: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let config = EngineConfig {
            pinch_threshold: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_confidence_above_one() {
        let config = EngineConfig {
            confidence_threshold: 1.5,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_sexp() {
        let sexp = EngineConfig::default().config_sexp();
        assert!(sexp.contains(":pinch-threshold 0.040"));
        assert!(sexp.contains(":two-finger-threshold 0.050"));
        assert!(sexp.contains(":buffer-len 8"));
        assert!(sexp.contains(":cooldown-s 0.25"));
    }
}

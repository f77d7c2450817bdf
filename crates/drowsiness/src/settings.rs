//! Tunable monitoring parameters

use alerting::AlertType;
use serde::{Deserialize, Serialize};

/// User-tunable settings, externally mutable at any time and read by the
/// state machine and alert dispatch each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Detection strictness, 1 (lenient) to 10 (strict)
    pub sensitivity: u8,
    /// Forwarded opaquely to the alert controller, 0 to 10
    pub alert_volume: u8,
    /// Which alert channel(s) to fire on episode entry
    pub alert_type: AlertType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: 5,
            alert_volume: 7,
            alert_type: AlertType::Both,
        }
    }
}

impl Settings {
    /// Clamp both sliders into their valid ranges.
    pub fn clamped(mut self) -> Self {
        self.sensitivity = self.sensitivity.clamp(1, 10);
        self.alert_volume = self.alert_volume.min(10);
        self
    }

    /// Map sensitivity to the consecutive-frame threshold.
    ///
    /// This mapping is an extension: the source system exposed the slider
    /// without wiring it to the thresholds. A linear step of two frames per
    /// notch keeps the default sensitivity (5) at the canonical threshold
    /// of 20 frames; higher sensitivity declares drowsiness sooner. The
    /// eye-ratio threshold itself is left fixed.
    pub fn consec_frames_threshold(&self) -> u32 {
        let sensitivity = u32::from(self.sensitivity.clamp(1, 10));
        (30 - 2 * sensitivity).max(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EYE_AR_CONSEC_FRAMES;

    #[test]
    fn test_defaults_match_observed_behavior() {
        let settings = Settings::default();
        assert_eq!(settings.sensitivity, 5);
        assert_eq!(settings.alert_volume, 7);
        assert_eq!(settings.alert_type, AlertType::Both);
        assert_eq!(settings.consec_frames_threshold(), EYE_AR_CONSEC_FRAMES);
    }

    #[test]
    fn test_sensitivity_mapping_is_monotonic() {
        let mut previous = u32::MAX;
        for sensitivity in 1..=10 {
            let settings = Settings {
                sensitivity,
                ..Default::default()
            };
            let threshold = settings.consec_frames_threshold();
            assert!(threshold <= previous);
            assert!(threshold >= 5);
            previous = threshold;
        }
    }

    #[test]
    fn test_clamping() {
        let settings = Settings {
            sensitivity: 0,
            alert_volume: 99,
            alert_type: AlertType::Beep,
        }
        .clamped();
        assert_eq!(settings.sensitivity, 1);
        assert_eq!(settings.alert_volume, 10);
    }
}

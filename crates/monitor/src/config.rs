//! Monitor configuration
//!
//! Layered loading: built-in defaults, then an optional `monitor.toml`,
//! then `MONITOR_*` environment variables.

use camera_capture::CameraConfig;
use detection::DetectorConfig;
use drowsiness::Settings;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the monitor binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Capture device parameters
    pub camera: CameraConfig,
    /// Face/eye detector parameters and model path
    pub detector: DetectorConfig,
    /// Initial user settings
    pub settings: Settings,
    /// Idle delay between loop iterations (milliseconds)
    pub tick_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            detector: DetectorConfig::default(),
            settings: Settings::default(),
            tick_interval_ms: 100,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from `monitor.toml` and the environment, falling
    /// back to defaults for anything unspecified.
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("monitor").required(false))
            .add_source(config::Environment::with_prefix("MONITOR").separator("__"))
            .build()?;
        cfg.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.settings.sensitivity, 5);
    }

    #[test]
    fn test_round_trips_through_serde() {
        let config = MonitorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tick_interval_ms, config.tick_interval_ms);
        assert_eq!(back.detector.face_model_path, config.detector.face_model_path);
    }
}

//! Alert channels and the dispatch seam

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which alert channel(s) to use when an episode begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Audible beep only
    Beep,
    /// Synthesized voice only
    Voice,
    /// Both channels
    #[default]
    Both,
}

impl AlertType {
    /// String form for config files and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beep => "beep",
            Self::Voice => "voice",
            Self::Both => "both",
        }
    }

    /// Parse an alert type from its string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beep" => Some(Self::Beep),
            "voice" => Some(Self::Voice),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Dispatch seam for the external sound/voice device.
///
/// Invoked exactly once per alert-episode entry, never per frame while an
/// episode persists; the volume is forwarded opaquely.
pub trait AlertController {
    fn trigger(&mut self, alert_type: AlertType, volume: u8);
}

/// Controller that reports alerts through the log instead of a device.
#[derive(Debug, Default)]
pub struct LogAlerter {
    triggered: u32,
}

impl LogAlerter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total alerts dispatched through this controller.
    pub fn triggered(&self) -> u32 {
        self.triggered
    }
}

impl AlertController for LogAlerter {
    fn trigger(&mut self, alert_type: AlertType, volume: u8) {
        self.triggered += 1;
        warn!(
            "DROWSINESS ALERT: channel={} volume={}",
            alert_type.as_str(),
            volume
        );
    }
}

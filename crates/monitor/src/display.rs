//! Display sink seam
//!
//! The UI surface is an external collaborator; the loop hands it one
//! [`DisplayUpdate`] per iteration.

use camera_capture::VideoFrame;
use tracing::info;

/// Placeholder shown instead of a frame while not monitoring.
pub const PLACEHOLDER_TEXT: &str = "Camera feed will appear here when monitoring is started.";

/// Per-iteration status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    Drowsy,
    Monitoring,
    NotMonitoring,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drowsy => "DROWSINESS DETECTED!",
            Self::Monitoring => "Monitoring...",
            Self::NotMonitoring => "Not Monitoring",
        }
    }
}

/// Everything the display receives for one iteration.
#[derive(Debug)]
pub struct DisplayUpdate {
    /// Annotated frame, or `None` for the placeholder
    pub frame: Option<VideoFrame>,
    pub status: StatusLabel,
    /// Session elapsed time, formatted `HH:MM:SS`
    pub elapsed: String,
    pub alert_count: u32,
}

/// Receives the annotated frame (or placeholder), status label, elapsed
/// duration, and alert count once per loop iteration.
pub trait DisplaySink {
    fn present(&mut self, update: DisplayUpdate);
}

/// Sink that reports status transitions through the log.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last_status: Option<StatusLabel>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for LogDisplay {
    fn present(&mut self, update: DisplayUpdate) {
        // Log on transitions only; per-frame repetition would drown the log
        if self.last_status != Some(update.status) {
            info!(
                "Status: {} | Session Duration: {} | Alerts: {}",
                update.status.as_str(),
                update.elapsed,
                update.alert_count
            );
            if update.frame.is_none() {
                info!("{}", PLACEHOLDER_TEXT);
            }
            self.last_status = Some(update.status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(StatusLabel::Drowsy.as_str(), "DROWSINESS DETECTED!");
        assert_eq!(StatusLabel::Monitoring.as_str(), "Monitoring...");
        assert_eq!(StatusLabel::NotMonitoring.as_str(), "Not Monitoring");
    }
}

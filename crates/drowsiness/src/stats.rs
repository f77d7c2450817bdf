//! Session statistics: wall-clock duration and alert episode count

use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Monitoring-session statistics.
///
/// Reset on `start`, frozen on `stop`; never persisted across process
/// restarts.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    monitoring: bool,
    start_time: Option<Instant>,
    elapsed_seconds: u64,
    alert_count: u32,
}

/// Snapshot of the stats for display and serialization.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub monitoring: bool,
    pub elapsed_seconds: u64,
    pub elapsed_display: String,
    pub alert_count: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session: resets elapsed time and the alert count.
    pub fn start(&mut self, now: Instant) {
        self.monitoring = true;
        self.start_time = Some(now);
        self.elapsed_seconds = 0;
        self.alert_count = 0;
        info!("Monitoring session started");
    }

    /// End the session; the elapsed value stays frozen at its last computed
    /// value.
    pub fn stop(&mut self) {
        self.monitoring = false;
        self.start_time = None;
        info!(
            "Monitoring session stopped after {} with {} alert(s)",
            self.format_elapsed(),
            self.alert_count
        );
    }

    /// Recompute elapsed seconds; a no-op unless monitoring.
    pub fn tick(&mut self, now: Instant) {
        if let (true, Some(start)) = (self.monitoring, self.start_time) {
            self.elapsed_seconds = now.saturating_duration_since(start).as_secs();
        }
    }

    /// Count one alert episode entry. Called by the state machine exactly
    /// once per transition into an episode.
    pub fn record_alert(&mut self) {
        self.alert_count += 1;
    }

    pub fn monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn alert_count(&self) -> u32 {
        self.alert_count
    }

    /// Elapsed time as `HH:MM:SS`.
    pub fn format_elapsed(&self) -> String {
        format_duration(self.elapsed_seconds)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            monitoring: self.monitoring,
            elapsed_seconds: self.elapsed_seconds,
            elapsed_display: self.format_elapsed(),
            alert_count: self.alert_count,
        }
    }
}

/// Format whole seconds as `HH:MM:SS`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_start_resets_counters() {
        let mut stats = SessionStats::new();
        stats.record_alert();
        stats.start(Instant::now());
        assert!(stats.monitoring());
        assert_eq!(stats.alert_count(), 0);
        assert_eq!(stats.elapsed_seconds(), 0);
    }

    #[test]
    fn test_elapsed_is_monotonic_and_freezes_on_stop() {
        let mut stats = SessionStats::new();
        let t0 = Instant::now();
        stats.start(t0);

        let mut previous = 0;
        for secs in [1u64, 5, 5, 42] {
            stats.tick(t0 + Duration::from_secs(secs));
            assert!(stats.elapsed_seconds() >= previous);
            previous = stats.elapsed_seconds();
        }
        assert_eq!(stats.elapsed_seconds(), 42);

        stats.stop();
        stats.tick(t0 + Duration::from_secs(1000));
        assert_eq!(stats.elapsed_seconds(), 42);
        assert!(!stats.monitoring());
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut stats = SessionStats::new();
        stats.tick(Instant::now());
        assert_eq!(stats.elapsed_seconds(), 0);
    }

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(61), "00:01:01");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(10 * 3600 + 59 * 60 + 59), "10:59:59");
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut stats = SessionStats::new();
        let t0 = Instant::now();
        stats.start(t0);
        stats.record_alert();
        stats.tick(t0 + Duration::from_secs(75));

        let snap = stats.snapshot();
        assert!(snap.monitoring);
        assert_eq!(snap.alert_count, 1);
        assert_eq!(snap.elapsed_display, "00:01:15");
    }
}

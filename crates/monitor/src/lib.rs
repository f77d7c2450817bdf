//! Monitoring loop orchestrator
//!
//! Single-threaded cooperative polling loop: one iteration is one capture,
//! one full pipeline pass, one display/stat update, then a fixed idle
//! delay. Frame N+1 capture only begins after frame N's pipeline completes.
//! The camera is acquired before the loop starts and released on every exit
//! path.

pub mod annotate;
pub mod config;
pub mod control;
pub mod display;

pub use annotate::annotate;
pub use config::MonitorConfig;
pub use control::ControlSurface;
pub use display::{DisplaySink, DisplayUpdate, LogDisplay, StatusLabel, PLACEHOLDER_TEXT};

use alerting::{AlertController, EpisodeLog};
use camera_capture::{CameraError, FrameSource};
use drowsiness::{DrowsinessError, FrameAnalyzer, SessionStats};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Frame capture failed: {0}")]
    Capture(#[from] CameraError),

    #[error("Pipeline failed: {0}")]
    Pipeline(#[from] DrowsinessError),
}

/// Initialize the global tracing subscriber.
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    // Ignored when a subscriber is already installed (tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// The orchestrator: pulls frames, drives the pipeline, forwards results.
pub struct MonitoringLoop<P, S, D, A> {
    pipeline: P,
    source: S,
    display: D,
    alerter: A,
    control: ControlSurface,
    stats: SessionStats,
    episodes: EpisodeLog,
    tick_interval: Duration,
    max_ticks: Option<u64>,
}

impl<P, S, D, A> MonitoringLoop<P, S, D, A>
where
    P: FrameAnalyzer,
    S: FrameSource,
    D: DisplaySink,
    A: AlertController,
{
    pub fn new(pipeline: P, source: S, display: D, alerter: A, control: ControlSurface) -> Self {
        Self {
            pipeline,
            source,
            display,
            alerter,
            control,
            stats: SessionStats::new(),
            episodes: EpisodeLog::new(),
            tick_interval: Duration::from_millis(100),
            max_ticks: None,
        }
    }

    /// Override the idle delay between iterations.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Stop after a fixed number of iterations (demos and tests).
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn episodes(&self) -> &EpisodeLog {
        &self.episodes
    }

    /// Run until a fault or the tick limit. The capture source is released
    /// on every exit path before the error propagates.
    pub async fn run(mut self) -> Result<(), MonitorError> {
        info!("Monitoring loop started");
        let result = self.run_inner().await;
        self.source.release();
        if let Err(err) = &result {
            error!("Monitoring loop terminated: {}", err);
        } else {
            info!("Monitoring loop finished");
        }
        result
    }

    async fn run_inner(&mut self) -> Result<(), MonitorError> {
        let mut ticks = 0u64;
        loop {
            if let Some(max) = self.max_ticks {
                if ticks >= max {
                    return Ok(());
                }
            }
            self.tick(Instant::now())?;
            ticks += 1;
            tokio::time::sleep(self.tick_interval).await;
        }
    }

    /// One loop iteration, driven with an explicit clock for testability.
    pub fn tick(&mut self, now: Instant) -> Result<(), MonitorError> {
        // Start/stop are observed as flag edges; the transitions themselves
        // happen here, on the loop's own thread.
        let monitoring = self.control.is_monitoring();
        if monitoring && !self.stats.monitoring() {
            self.stats.start(now);
            self.pipeline.reset();
            self.episodes.clear();
        } else if !monitoring && self.stats.monitoring() {
            self.stats.stop();
        }

        if !monitoring {
            self.display.present(DisplayUpdate {
                frame: None,
                status: StatusLabel::NotMonitoring,
                elapsed: self.stats.format_elapsed(),
                alert_count: self.stats.alert_count(),
            });
            return Ok(());
        }

        let settings = self.control.settings();
        self.pipeline.apply_settings(&settings);
        self.stats.tick(now);

        let mut frame = self.source.capture().map_err(|err| {
            error!("Failed to capture video frame: {}", err);
            err
        })?;

        let analysis = self
            .pipeline
            .analyze(&frame, &mut self.stats)
            .map_err(|err| {
                error!("Pipeline fault on frame {}: {}", frame.sequence, err);
                err
            })?;

        if analysis.episode_entered {
            self.alerter.trigger(settings.alert_type, settings.alert_volume);
            self.episodes.record_entry(now, frame.sequence);
        }

        annotate(&mut frame, &analysis);
        let status = if analysis.currently_drowsy {
            StatusLabel::Drowsy
        } else {
            StatusLabel::Monitoring
        };
        self.display.present(DisplayUpdate {
            frame: Some(frame),
            status,
            elapsed: self.stats.format_elapsed(),
            alert_count: self.stats.alert_count(),
        });
        Ok(())
    }
}

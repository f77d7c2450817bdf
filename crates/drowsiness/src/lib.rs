//! Drowsiness detection core
//!
//! Per-frame inference pipeline and the temporal state machine that turns
//! noisy single-frame eye/face detections into a debounced alert signal:
//! - Face/eye localization (via the `detection` crate)
//! - Eye-openness classification
//! - Consecutive-closed-frame accumulation with single-shot episode entry
//! - Session statistics (duration, alert count)

pub mod analysis;
pub mod settings;
pub mod state;
pub mod stats;

pub use analysis::FrameAnalysis;
pub use settings::Settings;
pub use state::{
    DrowsinessState, DrowsinessStateMachine, FaceObservation, FrameOutcome, Phase,
    EYE_AR_CONSEC_FRAMES,
};
pub use stats::{format_duration, SessionStats, StatsSnapshot};

use camera_capture::VideoFrame;
use detection::{
    DetectionError, DetectorConfig, EyeOpennessEstimator, EyeRegion, FaceEyeDetector,
};
use thiserror::Error;
use tracing::debug;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum DrowsinessError {
    #[error("Detection failed: {0}")]
    Detection(#[from] DetectionError),
}

/// Seam between the monitoring loop and the inference pipeline.
///
/// The production implementation is [`DrowsinessPipeline`]; tests drive the
/// loop with scripted analyzers instead of a camera and model.
pub trait FrameAnalyzer {
    /// Apply settings that affect detection thresholds.
    fn apply_settings(&mut self, settings: &Settings);

    /// Reset temporal state at session start.
    fn reset(&mut self);

    /// Run one full pipeline pass over a frame.
    fn analyze(
        &mut self,
        frame: &VideoFrame,
        stats: &mut SessionStats,
    ) -> Result<FrameAnalysis, DrowsinessError>;
}

/// One-frame-at-a-time drowsiness pipeline.
///
/// Owns the detector, estimator, and state machine; statistics are owned by
/// the caller and mutated through `analyze` so episode counting stays with
/// the session they belong to.
pub struct DrowsinessPipeline {
    detector: FaceEyeDetector,
    estimator: EyeOpennessEstimator,
    machine: DrowsinessStateMachine,
}

impl DrowsinessPipeline {
    /// Build the pipeline. Fails (startup-fatal) when the face model
    /// resource cannot be loaded.
    pub fn new(config: &DetectorConfig) -> Result<Self, DrowsinessError> {
        Ok(Self {
            detector: FaceEyeDetector::new(config)?,
            estimator: EyeOpennessEstimator::default(),
            machine: DrowsinessStateMachine::default(),
        })
    }

    /// Apply settings that affect detection thresholds.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.machine.set_threshold(settings.consec_frames_threshold());
    }

    /// Reset temporal state at session start.
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    pub fn state(&self) -> &DrowsinessState {
        self.machine.state()
    }

    /// Run one full pipeline pass over a frame.
    ///
    /// Zero faces or zero eyes is a valid outcome handled by the state
    /// machine; only lower-level image-processing faults surface as errors,
    /// fatal to the current frame.
    pub fn analyze_frame(
        &mut self,
        frame: &VideoFrame,
        stats: &mut SessionStats,
    ) -> Result<FrameAnalysis, DrowsinessError> {
        let gray = frame.to_grayscale();
        let faces = self.detector.detect_faces(&gray)?;

        if faces.is_empty() {
            self.machine.advance(&[], stats);
            return Ok(FrameAnalysis::no_face());
        }

        let mut observations = Vec::with_capacity(faces.len());
        let mut eyes = Vec::new();
        let mut openness = Vec::new();
        for face in &faces {
            let sub = FaceEyeDetector::face_sub_image(&gray, face);
            let eye_regions = self.detector.detect_eyes(&sub)?;
            debug!(
                "Face at ({}, {}): {} eye(s) detected",
                face.x,
                face.y,
                eye_regions.len()
            );

            let mut observation = FaceObservation::default();
            for region in &eye_regions {
                let eye = self.estimator.estimate_region(region);
                observation.eyes.push(eye);
                openness.push(eye);
                // Lift into frame coordinates for annotation
                eyes.push(EyeRegion {
                    x: face.x + region.x,
                    y: face.y + region.y,
                    width: region.width,
                    height: region.height,
                });
            }
            observations.push(observation);
        }

        let outcome = self.machine.advance(&observations, stats);

        Ok(FrameAnalysis {
            face_detected: true,
            faces,
            eyes,
            openness,
            currently_drowsy: outcome.currently_drowsy,
            episode_entered: outcome.episode_entered,
            consecutive_closed_frames: outcome.consecutive_closed_frames,
        })
    }
}

impl FrameAnalyzer for DrowsinessPipeline {
    fn apply_settings(&mut self, settings: &Settings) {
        DrowsinessPipeline::apply_settings(self, settings);
    }

    fn reset(&mut self) {
        DrowsinessPipeline::reset(self);
    }

    fn analyze(
        &mut self,
        frame: &VideoFrame,
        stats: &mut SessionStats,
    ) -> Result<FrameAnalysis, DrowsinessError> {
        self.analyze_frame(frame, stats)
    }
}

//! Per-frame analysis results

use detection::{EyeOpenness, EyeRegion, FaceRegion};
use serde::Serialize;

/// Everything one pipeline pass produced for one frame.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameAnalysis {
    /// Whether any face was detected
    pub face_detected: bool,
    /// Detected face regions in frame coordinates
    pub faces: Vec<FaceRegion>,
    /// Detected eye regions in frame coordinates (across all faces)
    pub eyes: Vec<EyeRegion>,
    /// Openness classification per detected eye, same order as `eyes`
    pub openness: Vec<EyeOpenness>,
    /// Frame's final drowsiness verdict
    pub currently_drowsy: bool,
    /// True only on the frame that entered a new alert episode
    pub episode_entered: bool,
    /// Counter value after this frame
    pub consecutive_closed_frames: u32,
}

impl FrameAnalysis {
    /// A frame where no face was visible.
    pub fn no_face() -> Self {
        Self::default()
    }
}

//! Eye-openness estimation from region geometry
//!
//! A deliberate simplification: openness is the height/width ratio of the
//! detected eye bounding box, not a landmark-based eye aspect ratio. Good
//! enough to separate a tall open-eye band from a collapsed lash line.

use crate::EyeRegion;
use serde::{Deserialize, Serialize};

/// Default ratio below which an eye counts as closed.
pub const EYE_AR_THRESH: f32 = 0.25;

/// Per-eye, per-frame openness classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeOpenness {
    /// Bounding-box height/width ratio
    pub ratio: f32,
    /// Whether the ratio fell below the closed threshold
    pub closed: bool,
}

impl EyeOpenness {
    /// Build directly from a ratio, for callers that already have one.
    pub fn from_ratio(ratio: f32, threshold: f32) -> Self {
        Self {
            ratio,
            closed: ratio < threshold,
        }
    }
}

/// Converts eye regions into open/closed calls.
#[derive(Debug, Clone)]
pub struct EyeOpennessEstimator {
    threshold: f32,
}

impl Default for EyeOpennessEstimator {
    fn default() -> Self {
        Self::new(EYE_AR_THRESH)
    }
}

impl EyeOpennessEstimator {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Estimate openness from an eye region without materializing the crop.
    pub fn estimate_region(&self, region: &EyeRegion) -> EyeOpenness {
        self.from_dimensions(region.width, region.height)
    }

    fn from_dimensions(&self, width: u32, height: u32) -> EyeOpenness {
        // Degenerate regions count as fully closed
        let ratio = if width == 0 {
            0.0
        } else {
            height as f32 / width as f32
        };
        EyeOpenness::from_ratio(ratio, self.threshold)
    }
}

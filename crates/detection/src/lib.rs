//! Face and eye localization for the drowsiness monitor
//!
//! - Face detection via the SeetaFace funnelled cascade (`rustface`)
//! - Eye detection via a Haar-like multi-scale scan within the face region
//! - Eye-openness estimation from the bounding-box height/width ratio
//!
//! Detection is best-effort: zero faces or zero eyes in a frame is a valid,
//! non-error outcome. Only resource failures (model missing) and malformed
//! frames are errors.

pub mod cascade;
pub mod openness;

pub use cascade::{CascadeParams, EyeCascade};
pub use openness::{EyeOpenness, EyeOpennessEstimator, EYE_AR_THRESH};

use image::GrayImage;
use rustface::ImageData;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Detection error types
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}

/// Face bounding box in frame coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub score: f32,
}

/// Eye bounding box relative to its face region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Configuration for the face/eye detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Path to the SeetaFace frontal-face model
    pub face_model_path: String,
    /// Face scan parameters
    pub face_params: CascadeParams,
    /// Eye scan parameters
    pub eye_params: CascadeParams,
    /// Minimum detector score to accept a face
    pub face_score_thresh: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            face_model_path: "models/seeta_fd_frontal_v1.0.bin".to_string(),
            face_params: CascadeParams::faces(),
            eye_params: CascadeParams::eyes(),
            face_score_thresh: 2.0,
        }
    }
}

/// Locates faces in a grayscale frame and eyes within each face.
///
/// Holds no detection state between calls; construction is the only
/// fallible resource acquisition (the face model file), and a failure there
/// is startup-fatal for the monitor.
pub struct FaceEyeDetector {
    detector: Box<dyn rustface::Detector>,
    eye_cascade: EyeCascade,
    min_face_size: u32,
    score_thresh: f64,
}

impl FaceEyeDetector {
    /// Create a detector, loading the face model from the configured path.
    pub fn new(config: &DetectorConfig) -> Result<Self, DetectionError> {
        let path = Path::new(&config.face_model_path);
        info!("Loading face detection model from {}", path.display());
        let bytes = std::fs::read(path)
            .map_err(|e| DetectionError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let model = rustface::read_model(std::io::Cursor::new(bytes))
            .map_err(|e| DetectionError::ModelLoad(e.to_string()))?;

        let mut detector = rustface::create_detector_with_model(model);
        detector.set_min_face_size(config.face_params.min_size);
        detector.set_score_thresh(config.face_score_thresh);
        // rustface scans a shrinking pyramid; its factor is the inverse of
        // the classical multi-scale growth factor.
        detector.set_pyramid_scale_factor(1.0 / config.face_params.scale_factor);
        detector.set_slide_window_step(4, 4);

        Ok(Self {
            detector,
            eye_cascade: EyeCascade::new(config.eye_params.clone()),
            min_face_size: config.face_params.min_size,
            score_thresh: config.face_score_thresh,
        })
    }

    /// Detect faces in a grayscale frame. Zero results is not an error.
    pub fn detect_faces(&mut self, gray: &GrayImage) -> Result<Vec<FaceRegion>, DetectionError> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(DetectionError::MalformedFrame("zero-sized frame".into()));
        }

        let image = ImageData::new(gray.as_raw(), width, height);
        let faces = self.detector.detect(&image);

        let mut regions = Vec::with_capacity(faces.len());
        for face in &faces {
            if face.score() < self.score_thresh {
                continue;
            }
            let bbox = face.bbox();
            // Clamp to frame bounds; the cascade may propose boxes that
            // overhang the edges.
            let x = bbox.x().max(0) as u32;
            let y = bbox.y().max(0) as u32;
            let w = bbox.width().min(width.saturating_sub(x));
            let h = bbox.height().min(height.saturating_sub(y));
            if w < self.min_face_size || h < self.min_face_size {
                continue;
            }
            regions.push(FaceRegion {
                x,
                y,
                width: w,
                height: h,
                score: face.score() as f32,
            });
        }
        debug!("Detected {} face(s)", regions.len());
        Ok(regions)
    }

    /// Detect eyes within a face sub-image. Coordinates are relative to the
    /// sub-image. Zero results is not an error.
    pub fn detect_eyes(&self, face_gray: &GrayImage) -> Result<Vec<EyeRegion>, DetectionError> {
        let (width, height) = face_gray.dimensions();
        if width == 0 || height == 0 {
            return Err(DetectionError::MalformedFrame("zero-sized face region".into()));
        }
        Ok(self.eye_cascade.detect(face_gray))
    }

    /// Crop the grayscale sub-image for a face region.
    pub fn face_sub_image(gray: &GrayImage, face: &FaceRegion) -> GrayImage {
        image::imageops::crop_imm(gray, face.x, face.y, face.width, face.height).to_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_load_failure_is_reported() {
        let config = DetectorConfig {
            face_model_path: "/nonexistent/model.bin".to_string(),
            ..Default::default()
        };
        match FaceEyeDetector::new(&config) {
            Err(DetectionError::ModelLoad(msg)) => assert!(msg.contains("/nonexistent/model.bin")),
            other => panic!("expected ModelLoad error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_face_sub_image_bounds() {
        let gray = GrayImage::from_pixel(100, 80, image::Luma([128]));
        let face = FaceRegion {
            x: 10,
            y: 20,
            width: 40,
            height: 30,
            score: 1.0,
        };
        let sub = FaceEyeDetector::face_sub_image(&gray, &face);
        assert_eq!(sub.dimensions(), (40, 30));
    }
}

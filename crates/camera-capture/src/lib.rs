//! Camera Capture Library for the Drowsiness Monitor
//!
//! Provides owned video frame buffers plus the [`FrameSource`] trait the
//! monitoring loop pulls frames through. The physical capture device is an
//! external collaborator; this crate defines the seam and ships a
//! deterministic synthetic source for demos and integration tests.

pub mod frame;
pub mod source;

pub use frame::VideoFrame;
pub use source::{FrameScript, SyntheticSource};

use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Frame capture failed: {0}")]
    Capture(String),

    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Camera not initialized")]
    NotInitialized,
}

/// Source of video frames for the monitoring loop.
///
/// `capture` failures are session-fatal: the loop reports the error, stops,
/// and calls [`FrameSource::release`]. Implementations must also release the
/// underlying device on drop so the resource survives no exit path.
pub trait FrameSource {
    /// Capture the next frame.
    fn capture(&mut self) -> Result<VideoFrame, CameraError>;

    /// Release the underlying capture device. Idempotent.
    fn release(&mut self);
}

/// Camera configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CameraConfig {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 15,
        }
    }
}

//! Synthetic frame source for demos and integration tests

use crate::frame::VideoFrame;
use crate::{CameraError, FrameSource};
use image::{Rgb, RgbImage};
use tracing::debug;

/// Script controlling what a [`SyntheticSource`] produces.
#[derive(Debug, Clone)]
pub struct FrameScript {
    /// Background luminance of generated frames
    pub luma: u8,
    /// Capture calls that succeed before the source reports a capture
    /// failure; `None` streams forever
    pub frames_before_failure: Option<u32>,
}

impl Default for FrameScript {
    fn default() -> Self {
        Self {
            luma: 160,
            frames_before_failure: None,
        }
    }
}

/// Deterministic in-process frame source.
///
/// Produces flat frames with a darker center block so downstream image code
/// has some structure to chew on, and can be scripted to fail mid-session to
/// exercise the loop's fatal-capture path.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_interval_ns: u64,
    script: FrameScript,
    sequence: u32,
    released: bool,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, fps: u32, script: FrameScript) -> Self {
        Self {
            width,
            height,
            frame_interval_ns: 1_000_000_000 / u64::from(fps.max(1)),
            script,
            sequence: 0,
            released: false,
        }
    }

    fn render(&self) -> RgbImage {
        let bg = self.script.luma;
        let mut img = RgbImage::from_pixel(self.width, self.height, Rgb([bg, bg, bg]));
        let (cx, cy) = (self.width / 4, self.height / 4);
        for y in cy..(cy + self.height / 2) {
            for x in cx..(cx + self.width / 2) {
                img.put_pixel(x, y, Rgb([bg / 2, bg / 2, bg / 2]));
            }
        }
        img
    }
}

impl FrameSource for SyntheticSource {
    fn capture(&mut self) -> Result<VideoFrame, CameraError> {
        if self.released {
            return Err(CameraError::NotInitialized);
        }
        if let Some(limit) = self.script.frames_before_failure {
            if self.sequence >= limit {
                return Err(CameraError::Capture("synthetic stream exhausted".into()));
            }
        }
        let frame = VideoFrame::new(
            self.render(),
            u64::from(self.sequence) * self.frame_interval_ns,
            self.sequence,
        );
        self.sequence += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        if !self.released {
            debug!("Releasing synthetic frame source after {} frames", self.sequence);
            self.released = true;
        }
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_advances() {
        let mut source = SyntheticSource::new(32, 24, 10, FrameScript::default());
        let a = source.capture().unwrap();
        let b = source.capture().unwrap();
        assert_eq!(a.sequence, 0);
        assert_eq!(b.sequence, 1);
        assert!(b.timestamp_ns > a.timestamp_ns);
    }

    #[test]
    fn test_scripted_failure() {
        let script = FrameScript {
            frames_before_failure: Some(2),
            ..Default::default()
        };
        let mut source = SyntheticSource::new(32, 24, 10, script);
        assert!(source.capture().is_ok());
        assert!(source.capture().is_ok());
        assert!(matches!(source.capture(), Err(CameraError::Capture(_))));
    }

    #[test]
    fn test_release_is_sticky() {
        let mut source = SyntheticSource::new(32, 24, 10, FrameScript::default());
        source.release();
        source.release();
        assert!(matches!(source.capture(), Err(CameraError::NotInitialized)));
    }
}

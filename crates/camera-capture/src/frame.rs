//! Video frame types

use image::{GrayImage, RgbImage};

/// Decoded RGB video frame.
///
/// Owned by the monitoring loop for one iteration and discarded after the
/// pipeline pass; nothing in the system holds a frame across iterations.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel buffer
    pub rgb: RgbImage,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from an RGB buffer
    pub fn new(rgb: RgbImage, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            rgb,
            timestamp_ns,
            sequence,
        }
    }

    /// Create a frame from raw interleaved RGB data (width * height * 3 bytes)
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(|rgb| Self::new(rgb, timestamp_ns, sequence))
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    /// Grayscale view of the frame, used by the detection pipeline
    pub fn to_grayscale(&self) -> GrayImage {
        image::imageops::grayscale(&self.rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_size_check() {
        // Buffer too short for 4x4 RGB
        assert!(VideoFrame::from_raw(vec![0u8; 10], 4, 4, 0, 0).is_none());

        let frame = VideoFrame::from_raw(vec![128u8; 4 * 4 * 3], 4, 4, 17, 3).unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.sequence, 3);
    }

    #[test]
    fn test_grayscale_dimensions() {
        let frame = VideoFrame::from_raw(vec![200u8; 8 * 6 * 3], 8, 6, 0, 0).unwrap();
        let gray = frame.to_grayscale();
        assert_eq!(gray.dimensions(), (8, 6));
        // Uniform input stays uniform after luma conversion
        assert!(gray.pixels().all(|p| p.0[0] == gray.get_pixel(0, 0).0[0]));
    }
}

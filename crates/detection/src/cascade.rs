//! Haar-like multi-scale eye scan over integral images
//!
//! Square candidate windows are slid across the face sub-image at a growing
//! pyramid of sizes. A window is a candidate when its middle horizontal band
//! (iris and lash line) is markedly darker than the bands above and below it
//! (brow and cheek). Candidates are grouped by overlap, weak groups are
//! discarded, and each surviving box is refined vertically to the extent of
//! its dark rows so the height/width ratio tracks eye openness.

use crate::EyeRegion;
use image::GrayImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Multi-scale scan parameters, shared between the face and eye passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeParams {
    /// Growth factor between consecutive window sizes
    pub scale_factor: f32,
    /// Minimum overlapping candidates for a detection to survive grouping
    pub min_neighbors: usize,
    /// Smallest scanned window side in pixels
    pub min_size: u32,
}

impl CascadeParams {
    /// Face scan defaults: 1.1 scale step, 5 neighbors, 30x30 minimum.
    pub fn faces() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_size: 30,
        }
    }

    /// Eye scan defaults: unconstrained apart from a small physical floor.
    pub fn eyes() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 3,
            min_size: 12,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    x: u32,
    y: u32,
    size: u32,
}

impl Window {
    fn iou(&self, other: &Window) -> f32 {
        let ix1 = self.x.max(other.x) as f32;
        let iy1 = self.y.max(other.y) as f32;
        let ix2 = (self.x + self.size).min(other.x + other.size) as f32;
        let iy2 = (self.y + self.size).min(other.y + other.size) as f32;
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        let a = (self.size * self.size) as f32;
        let b = (other.size * other.size) as f32;
        inter / (a + b - inter)
    }

    fn contains_center_of(&self, other: &Window) -> bool {
        let cx = other.x + other.size / 2;
        let cy = other.y + other.size / 2;
        cx >= self.x && cx < self.x + self.size && cy >= self.y && cy < self.y + self.size
    }

    /// Same detection when boxes overlap strongly or are concentric across
    /// pyramid scales.
    fn same_detection(&self, other: &Window) -> bool {
        self.iou(other) > 0.3
            || self.contains_center_of(other)
            || other.contains_center_of(self)
    }
}

/// Eye detector over a face sub-image.
#[derive(Debug, Clone)]
pub struct EyeCascade {
    params: CascadeParams,
    /// Minimum surround-minus-center contrast (gray levels) for a candidate
    contrast_thresh: f32,
    /// How far below the box mean a row must be to count as dark
    dark_bias: f32,
}

impl EyeCascade {
    pub fn new(params: CascadeParams) -> Self {
        Self {
            params,
            contrast_thresh: 18.0,
            dark_bias: 4.0,
        }
    }

    /// Scan the face sub-image and return grouped, refined eye regions.
    pub fn detect(&self, face: &GrayImage) -> Vec<EyeRegion> {
        let (width, height) = face.dimensions();
        let max_size = (width.min(height)) / 3;
        if self.params.min_size > max_size {
            return Vec::new();
        }

        let integral = integral_image(face);
        let candidates = self.scan(&integral, width, height, max_size);
        let grouped = group_windows(&candidates, self.params.min_neighbors);

        grouped
            .into_iter()
            .map(|w| self.refine_vertical(&integral, clamp_window(w, width, height)))
            .collect()
    }

    fn scan(&self, integral: &Array2<u64>, width: u32, height: u32, max_size: u32) -> Vec<Window> {
        let mut candidates = Vec::new();
        let mut size = self.params.min_size;
        while size <= max_size {
            let band = size / 3;
            let stride = (size / 6).max(2);
            let mut y = 0;
            while y + size <= height {
                let mut x = 0;
                while x + size <= width {
                    let top = region_mean(integral, x, y, size, band);
                    let mid = region_mean(integral, x, y + band, size, band);
                    let bottom = region_mean(integral, x, y + 2 * band, size, band);
                    let surround = (top + bottom) / 2.0;
                    if surround - mid >= self.contrast_thresh {
                        candidates.push(Window { x, y, size });
                    }
                    x += stride;
                }
                y += stride;
            }
            // Guarantee progress for small sizes where the factor rounds away
            size = ((size as f32 * self.params.scale_factor) as u32).max(size + 1);
        }
        candidates
    }

    /// Shrink a grouped box vertically to its longest run of dark rows.
    /// An open eye keeps a tall dark band (iris, lashes, shadow); a closed
    /// eye collapses to a thin lash line, dropping the height/width ratio.
    fn refine_vertical(&self, integral: &Array2<u64>, window: Window) -> EyeRegion {
        let box_mean = region_mean(integral, window.x, window.y, window.size, window.size);
        let threshold = box_mean - self.dark_bias;

        let mut best_start = 0;
        let mut best_len = 0;
        let mut run_start = 0;
        let mut run_len = 0;
        for row in 0..window.size {
            let row_mean = region_mean(integral, window.x, window.y + row, window.size, 1);
            if row_mean < threshold {
                if run_len == 0 {
                    run_start = row;
                }
                run_len += 1;
                if run_len > best_len {
                    best_start = run_start;
                    best_len = run_len;
                }
            } else {
                run_len = 0;
            }
        }

        if best_len == 0 {
            // No dark band stands out; keep the full box
            return EyeRegion {
                x: window.x,
                y: window.y,
                width: window.size,
                height: window.size,
            };
        }
        EyeRegion {
            x: window.x,
            y: window.y + best_start,
            width: window.size,
            height: best_len,
        }
    }
}

/// Greedy overlap grouping: each candidate joins the first group whose
/// anchor it matches; groups below the neighbor threshold are dropped and
/// the survivors are averaged.
fn group_windows(candidates: &[Window], min_neighbors: usize) -> Vec<Window> {
    let mut groups: Vec<Vec<Window>> = Vec::new();
    for cand in candidates {
        match groups.iter_mut().find(|g| g[0].same_detection(cand)) {
            Some(group) => group.push(*cand),
            None => groups.push(vec![*cand]),
        }
    }

    groups
        .into_iter()
        .filter(|g| g.len() >= min_neighbors.max(1))
        .map(|g| {
            let n = g.len() as u32;
            Window {
                x: g.iter().map(|w| w.x).sum::<u32>() / n,
                y: g.iter().map(|w| w.y).sum::<u32>() / n,
                size: g.iter().map(|w| w.size).sum::<u32>() / n,
            }
        })
        .collect()
}

/// Keep a window fully inside the image, shrinking it when it rides an edge.
fn clamp_window(w: Window, width: u32, height: u32) -> Window {
    let size = w.size.min(width).min(height);
    Window {
        x: w.x.min(width - size),
        y: w.y.min(height - size),
        size,
    }
}

/// Summed-area table with a zero row/column of padding.
fn integral_image(gray: &GrayImage) -> Array2<u64> {
    let (width, height) = gray.dimensions();
    let mut integral = Array2::<u64>::zeros((height as usize + 1, width as usize + 1));
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += u64::from(gray.get_pixel(x, y).0[0]);
            integral[[y as usize + 1, x as usize + 1]] = integral[[y as usize, x as usize + 1]] + row_sum;
        }
    }
    integral
}

fn region_sum(integral: &Array2<u64>, x: u32, y: u32, w: u32, h: u32) -> u64 {
    let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);
    integral[[y + h, x + w]] + integral[[y, x]] - integral[[y, x + w]] - integral[[y + h, x]]
}

fn region_mean(integral: &Array2<u64>, x: u32, y: u32, w: u32, h: u32) -> f32 {
    if w == 0 || h == 0 {
        return 0.0;
    }
    region_sum(integral, x, y, w, h) as f32 / (w * h) as f32
}

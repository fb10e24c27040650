//! Canny edge map via `imageproc`.

use image::GrayImage;

use super::EdgeDetector;

/// Canny edge detector.
///
/// Thresholds may be given in either order; the smaller one is used as the
/// hysteresis low threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannyEdgeDetector;

impl EdgeDetector for CannyEdgeDetector {
    fn detect_edges(&self, gray: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
        let low = low_threshold.min(high_threshold);
        let high = low_threshold.max(high_threshold);
        imageproc::edges::canny(gray, low, high)
    }
}

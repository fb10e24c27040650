use image::GrayImage;

use crate::geometry::{distance, Circle, LineSegment};
use crate::primitives::{Binarizer, LineSegmentDetector};

use super::config::NeedleConfig;

/// Whether the segment's endpoints fall inside the pivot and tip windows.
///
/// Both windows are open intervals scaled by the dial radius; the nearer
/// endpoint is tested against the pivot window, the farther one against the
/// tip window.
pub(crate) fn fits_needle_windows(segment: &LineSegment, dial: &Circle, config: &NeedleConfig) -> bool {
    let center = dial.center();
    let r = dial.radius as f64;
    let d1 = distance(center, segment.start());
    let d2 = distance(center, segment.end());
    let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
    let [p_lo, p_hi] = config.pivot_window;
    let [t_lo, t_hi] = config.tip_window;
    p_lo * r < near && near < p_hi * r && t_lo * r < far && far < t_hi * r
}

/// Locate the needle: the first detected segment, in detector order, that
/// starts near the pivot and reaches toward the rim.
pub fn locate_needle(
    gray: &GrayImage,
    dial: &Circle,
    config: &NeedleConfig,
    binarizer: &dyn Binarizer,
    lines: &dyn LineSegmentDetector,
) -> Option<LineSegment> {
    let binary = binarizer.threshold(gray, config.binary_threshold, true);
    let segments = lines.detect_lines(&binary, &config.lines);
    tracing::debug!("needle search: {} line segments", segments.len());

    let needle = segments
        .into_iter()
        .find(|seg| fits_needle_windows(seg, dial, config));
    match &needle {
        Some(seg) => tracing::info!(
            "needle ({}, {}) - ({}, {})",
            seg.x1,
            seg.y1,
            seg.x2,
            seg.y2
        ),
        None => tracing::debug!("no segment fits the needle windows"),
    }
    needle
}

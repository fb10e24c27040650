use image::GrayImage;

use crate::geometry::{average_circles, Circle};
use crate::primitives::CircleDetector;

use super::config::DialConfig;

/// Locate the dial as the consensus of all circle candidates in the
/// configured radius band. `None` when the detector reports nothing.
pub fn locate_dial(
    gray: &GrayImage,
    config: &DialConfig,
    detector: &dyn CircleDetector,
) -> Option<Circle> {
    let (radius_min, radius_max) = config.radius_band(gray.height());
    let candidates = detector.detect(gray, radius_min, radius_max, config.min_separation_px);
    tracing::debug!(
        "dial search r=[{}, {}] returned {} candidates",
        radius_min,
        radius_max,
        candidates.len()
    );
    let dial = average_circles(&candidates)?;
    tracing::info!(
        "dial at ({}, {}) r={} from {} candidates",
        dial.center_x,
        dial.center_y,
        dial.radius,
        candidates.len()
    );
    Some(dial)
}

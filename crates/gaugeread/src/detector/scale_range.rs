//! Scale span estimation from the small tick marks printed inside the rim.
//!
//! Edge contours inside a disc mask are reduced to their centroids. Ticks in
//! the lower-left part of the dial can lower the start of the scale, ticks in
//! the lower-right part can raise its end. When nothing qualifies the seeded
//! span is kept.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as PixelPoint;
use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, Point};
use crate::primitives::{ContourExtractor, EdgeDetector};

use super::angle::{offset_angle, Quadrant};
use super::config::ScaleRangeConfig;
use super::value::{AngleRange, AngleRangeError};

/// Result of a scale-range scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRangeEstimate {
    pub min_angle: f64,
    pub max_angle: f64,
    /// `min_angle` came from a tick rather than the seed.
    pub min_detected: bool,
    /// `max_angle` came from a tick rather than the seed.
    pub max_detected: bool,
}

impl ScaleRangeEstimate {
    fn seeded(config: &ScaleRangeConfig) -> Self {
        Self {
            min_angle: config.start_seed_deg,
            max_angle: config.end_seed_deg,
            min_detected: false,
            max_detected: false,
        }
    }

    /// Neither bound was found in the image.
    pub fn is_default(&self) -> bool {
        !self.min_detected && !self.max_detected
    }

    pub fn angle_range(&self) -> Result<AngleRange, AngleRangeError> {
        AngleRange::new(self.min_angle, self.max_angle)
    }

    /// Fold one tick centroid into the estimate.
    fn update(self, tick: Point, dial: &Circle, config: &ScaleRangeConfig) -> Self {
        let center = dial.center();
        let (dx, dy) = (tick.x - center.x, center.y - tick.y);
        let Ok(angle) = offset_angle(dx, dy) else {
            return self;
        };
        match Quadrant::classify(dx, dy) {
            Quadrant::DownLeft if accepts_start(angle, self.min_angle, config) => Self {
                min_angle: angle,
                min_detected: true,
                ..self
            },
            Quadrant::DownRight if accepts_end(angle, self.max_angle, config) => Self {
                max_angle: angle,
                max_detected: true,
                ..self
            },
            _ => self,
        }
    }
}

fn accepts_start(angle: f64, current: f64, config: &ScaleRangeConfig) -> bool {
    angle > config.start_bound_deg && angle < current
}

fn accepts_end(angle: f64, current: f64, config: &ScaleRangeConfig) -> bool {
    angle < config.end_bound_deg && angle > current
}

/// Filled polygon approximating a disc of `mask_radius_frac * r` around the
/// dial center. Vertex coordinates are truncated to whole pixels.
pub(crate) fn scale_mask(width: u32, height: u32, dial: &Circle, config: &ScaleRangeConfig) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let rho = config.mask_radius_frac * dial.radius as f64;
    let (cx, cy) = (dial.center_x as f64, dial.center_y as f64);
    let mut poly: Vec<PixelPoint<i32>> = Vec::with_capacity(config.mask_vertices as usize);
    for i in 0..config.mask_vertices {
        let theta = (config.vertex_spacing_deg * i as f64).to_radians();
        let p = PixelPoint::new(
            (cx + rho * theta.cos()) as i32,
            (cy + rho * theta.sin()) as i32,
        );
        if poly.last() != Some(&p) {
            poly.push(p);
        }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() >= 3 {
        draw_polygon_mut(&mut mask, &poly, Luma([255u8]));
    }
    mask
}

/// Estimate the angular span of the printed scale.
///
/// Never fails: when no tick qualifies the seeded span is returned with both
/// `*_detected` flags unset.
pub fn detect_scale_range(
    gray: &GrayImage,
    dial: &Circle,
    config: &ScaleRangeConfig,
    edges: &dyn EdgeDetector,
    contours: &dyn ContourExtractor,
) -> ScaleRangeEstimate {
    let (w, h) = gray.dimensions();
    let mut edge_map = edges.detect_edges(gray, config.canny_low, config.canny_high);
    let mask = scale_mask(w, h, dial, config);
    for (e, m) in edge_map.pixels_mut().zip(mask.pixels()) {
        if m[0] == 0 {
            e[0] = 0;
        }
    }

    let found = contours.find_contours(&edge_map);
    let ticks: Vec<Point> = found
        .iter()
        .filter(|c| c.area < config.max_contour_area)
        .filter_map(|c| c.centroid())
        .collect();
    tracing::debug!(
        "scale scan: {} contours, {} below area {}",
        found.len(),
        ticks.len(),
        config.max_contour_area
    );

    let estimate = ticks
        .into_iter()
        .fold(ScaleRangeEstimate::seeded(config), |est, tick| {
            est.update(tick, dial, config)
        });
    tracing::info!(
        "scale range [{:.1}, {:.1}] (start {}, end {})",
        estimate.min_angle,
        estimate.max_angle,
        if estimate.min_detected { "detected" } else { "seed" },
        if estimate.max_detected { "detected" } else { "seed" }
    );
    estimate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{CannyEdgeDetector, Contour, OuterContourExtractor};
    use crate::test_utils::{scale_ticks_around_upright_needle, SyntheticGauge};
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;

    fn dial() -> Circle {
        Circle::new(100, 100, 80)
    }

    /// Edge detector that paints the whole image, so the mask alone decides
    /// what reaches the contour stage.
    struct AllEdges;

    impl EdgeDetector for AllEdges {
        fn detect_edges(&self, gray: &GrayImage, _low: f32, _high: f32) -> GrayImage {
            GrayImage::from_pixel(gray.width(), gray.height(), Luma([255]))
        }
    }

    /// Returns canned contours and keeps the binary image it was given.
    struct CannedContours {
        contours: Vec<Contour>,
        seen: RefCell<Option<GrayImage>>,
    }

    impl CannedContours {
        fn new(contours: Vec<Contour>) -> Self {
            Self {
                contours,
                seen: RefCell::new(None),
            }
        }
    }

    impl ContourExtractor for CannedContours {
        fn find_contours(&self, binary: &GrayImage) -> Vec<Contour> {
            *self.seen.borrow_mut() = Some(binary.clone());
            self.contours.clone()
        }
    }

    /// Small square contour centered on `(x, y)`.
    fn tick(x: f64, y: f64) -> Contour {
        Contour::from_points(vec![
            Point::new(x - 1.0, y - 1.0),
            Point::new(x + 1.0, y - 1.0),
            Point::new(x + 1.0, y + 1.0),
            Point::new(x - 1.0, y + 1.0),
        ])
    }

    /// Tick at gauge angle `deg` and distance `rho` from the dial center.
    fn tick_at(deg: f64, rho: f64) -> Contour {
        let a = deg.to_radians();
        let c = dial().center();
        tick(c.x - rho * a.sin(), c.y + rho * a.cos())
    }

    fn scan(contours: Vec<Contour>) -> ScaleRangeEstimate {
        let gray = GrayImage::new(200, 200);
        let extractor = CannedContours::new(contours);
        detect_scale_range(&gray, &dial(), &ScaleRangeConfig::default(), &AllEdges, &extractor)
    }

    #[test]
    fn no_contours_keeps_seeded_range() {
        let est = scan(Vec::new());
        assert_eq!(est.min_angle, 90.0);
        assert_eq!(est.max_angle, 270.0);
        assert!(est.is_default());
        assert_eq!(est.angle_range().unwrap(), AngleRange::new(90.0, 270.0).unwrap());
    }

    #[test]
    fn lower_ticks_widen_both_ends() {
        let est = scan(vec![tick_at(45.0, 50.0), tick_at(60.0, 50.0), tick_at(300.0, 50.0)]);
        assert_abs_diff_eq!(est.min_angle, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(est.max_angle, 300.0, epsilon = 1e-9);
        assert!(est.min_detected && est.max_detected);
    }

    #[test]
    fn ticks_beyond_reference_bounds_are_ignored() {
        let est = scan(vec![tick_at(30.0, 50.0), tick_at(335.0, 50.0)]);
        assert!(est.is_default());
        assert_eq!((est.min_angle, est.max_angle), (90.0, 270.0));
    }

    #[test]
    fn upper_half_and_axis_ticks_are_ignored() {
        let est = scan(vec![
            tick_at(135.0, 50.0),
            tick_at(225.0, 50.0),
            tick(100.0, 150.0),
            tick(50.0, 100.0),
        ]);
        assert!(est.is_default());
    }

    #[test]
    fn large_contours_are_filtered_by_area() {
        let a = 50f64.to_radians();
        let (x, y) = (100.0 - 50.0 * a.sin(), 100.0 + 50.0 * a.cos());
        let big = Contour::from_points(vec![
            Point::new(x - 5.0, y - 5.0),
            Point::new(x + 5.0, y - 5.0),
            Point::new(x + 5.0, y + 5.0),
            Point::new(x - 5.0, y + 5.0),
        ]);
        let est = scan(vec![big]);
        assert!(!est.min_detected);
    }

    #[test]
    fn contour_stage_sees_only_the_masked_disc() {
        let gray = GrayImage::new(200, 200);
        let extractor = CannedContours::new(Vec::new());
        detect_scale_range(&gray, &dial(), &ScaleRangeConfig::default(), &AllEdges, &extractor);
        let seen = extractor.seen.borrow().clone().expect("contour stage ran");
        assert_eq!(seen.get_pixel(100, 100)[0], 255);
        assert_eq!(seen.get_pixel(150, 100)[0], 255);
        // Rim at r=80 lies outside the 0.8r mask.
        assert_eq!(seen.get_pixel(178, 100)[0], 0);
        assert_eq!(seen.get_pixel(100, 20)[0], 0);
        assert_eq!(seen.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn builtin_primitives_detect_tick_span() {
        let gauge = SyntheticGauge {
            width: 200,
            height: 200,
            center: [100.0, 100.0],
            radius: 80.0,
            needle_deg: 180.0,
        };
        let gray = gauge.render_with_ticks(&scale_ticks_around_upright_needle());
        let est = detect_scale_range(
            &gray,
            &dial(),
            &ScaleRangeConfig::default(),
            &CannyEdgeDetector,
            &OuterContourExtractor,
        );
        assert!(est.min_detected && est.max_detected, "{est:?}");
        assert_abs_diff_eq!(est.min_angle, 45.0, epsilon = 3.0);
        assert_abs_diff_eq!(est.max_angle, 315.0, epsilon = 3.0);
    }

    #[test]
    fn builtin_primitives_keep_seed_without_ticks() {
        let gauge = SyntheticGauge {
            width: 200,
            height: 200,
            center: [100.0, 100.0],
            radius: 80.0,
            needle_deg: 180.0,
        };
        let est = detect_scale_range(
            &gauge.render(),
            &dial(),
            &ScaleRangeConfig::default(),
            &CannyEdgeDetector,
            &OuterContourExtractor,
        );
        assert!(est.is_default(), "{est:?}");
    }

    #[test]
    fn mask_of_tiny_dial_is_empty() {
        let mask = scale_mask(20, 20, &Circle::new(10, 10, 0), &ScaleRangeConfig::default());
        assert!(mask.pixels().all(|p| p[0] == 0));
    }
}

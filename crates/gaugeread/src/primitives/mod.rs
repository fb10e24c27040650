//! Low-level image primitives the gauge pipeline consumes.
//!
//! Each primitive sits behind a small trait so the pipeline can be driven by
//! the built-in implementations below or by any other backend (or a canned
//! stub in tests). The pipeline never inspects how a primitive works, only
//! what it returns.

mod contours;
mod edges;
mod hough_circles;
mod hough_segments;
mod threshold;

use image::GrayImage;

use crate::geometry::{CircleCandidate, LineSegment, Point};

pub use contours::{polygon_area, OuterContourExtractor};
pub use edges::CannyEdgeDetector;
pub use hough_circles::{HoughCircleConfig, HoughCircleDetector};
pub use hough_segments::{LineDetectParams, ProbabilisticHoughLines};
pub use threshold::ThresholdBinarizer;

/// Finds circle candidates with radius in `[radius_min, radius_max]`.
///
/// Candidates closer than `min_separation` pixels are reported once.
/// May return an empty list.
pub trait CircleDetector {
    fn detect(
        &self,
        gray: &GrayImage,
        radius_min: u32,
        radius_max: u32,
        min_separation: f32,
    ) -> Vec<CircleCandidate>;
}

/// Produces a binary edge map (edge pixels 255, others 0).
pub trait EdgeDetector {
    fn detect_edges(&self, gray: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage;
}

/// Extracts outer contours from a binary image.
pub trait ContourExtractor {
    fn find_contours(&self, binary: &GrayImage) -> Vec<Contour>;
}

/// Finds straight line segments in a binary image. May return an empty list.
///
/// The order of the returned segments is meaningful to callers that pick the
/// first acceptable one.
pub trait LineSegmentDetector {
    fn detect_lines(&self, binary: &GrayImage, params: &LineDetectParams) -> Vec<LineSegment>;
}

/// Fixed-level binarization. With `inverse`, pixels above `level` become 0
/// and the rest 255; otherwise the opposite.
pub trait Binarizer {
    fn threshold(&self, gray: &GrayImage, level: u8, inverse: bool) -> GrayImage;
}

/// A closed contour with its enclosed area in square pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
    pub area: f64,
}

impl Contour {
    /// Contour with the area computed from its points.
    pub fn from_points(points: Vec<Point>) -> Self {
        let area = polygon_area(&points);
        Self { points, area }
    }

    /// Mean of the contour points, `None` for an empty contour.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }
}

/// Borrowed set of primitives driving one pipeline run.
#[derive(Clone, Copy)]
pub struct Primitives<'a> {
    pub circles: &'a dyn CircleDetector,
    pub edges: &'a dyn EdgeDetector,
    pub contours: &'a dyn ContourExtractor,
    pub lines: &'a dyn LineSegmentDetector,
    pub binarizer: &'a dyn Binarizer,
}

/// Owned built-in primitives.
#[derive(Debug, Clone, Default)]
pub struct BuiltinPrimitives {
    pub circles: HoughCircleDetector,
    pub edges: CannyEdgeDetector,
    pub contours: OuterContourExtractor,
    pub lines: ProbabilisticHoughLines,
    pub binarizer: ThresholdBinarizer,
}

impl BuiltinPrimitives {
    pub fn new(circle_config: HoughCircleConfig, line_seed: u64) -> Self {
        Self {
            circles: HoughCircleDetector::new(circle_config),
            lines: ProbabilisticHoughLines::new(line_seed),
            ..Default::default()
        }
    }

    pub fn as_primitives(&self) -> Primitives<'_> {
        Primitives {
            circles: &self.circles,
            edges: &self.edges,
            contours: &self.contours,
            lines: &self.lines,
            binarizer: &self.binarizer,
        }
    }
}

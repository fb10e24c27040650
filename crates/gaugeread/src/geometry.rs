//! Geometric value types and the small amount of math shared by every stage.
//!
//! Coordinates are image pixels: x grows to the right, y grows downward.

use serde::{Deserialize, Serialize};

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Dial face: integer center and radius in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub center_x: i32,
    pub center_y: i32,
    pub radius: i32,
}

impl Circle {
    pub fn new(center_x: i32, center_y: i32, radius: i32) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x as f64, self.center_y as f64)
    }
}

/// One raw hit from a circle detector, before consensus averaging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleCandidate {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl CircleCandidate {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }
}

/// A detected line segment.
///
/// The endpoints carry no tip/pivot meaning; which end is the needle tip is
/// decided relative to a dial by [`crate::detector::needle_angle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1 as f64, self.y1 as f64)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2 as f64, self.y2 as f64)
    }

    /// Same segment with the endpoints exchanged.
    pub fn reversed(&self) -> Self {
        Self::new(self.x2, self.y2, self.x1, self.y1)
    }

    pub fn length(&self) -> f64 {
        distance(self.start(), self.end())
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// `atan(dy / dx)` in radians, principal value in (-π/2, π/2).
///
/// `dx == 0` yields ±π/2 (or NaN for `0/0`). Callers classify the offset with
/// [`crate::detector::Quadrant`] first and never use this value on an axis.
#[inline]
pub fn reference_angle_rad(dx: f64, dy: f64) -> f64 {
    (dy / dx).atan()
}

/// Consensus circle: componentwise mean of all candidates, truncated toward zero.
///
/// Returns `None` for an empty candidate list.
pub fn average_circles(candidates: &[CircleCandidate]) -> Option<Circle> {
    if candidates.is_empty() {
        return None;
    }
    let n = candidates.len() as f64;
    let (sx, sy, sr) = candidates
        .iter()
        .fold((0.0, 0.0, 0.0), |(sx, sy, sr), c| {
            (sx + c.x, sy + c.y, sr + c.radius)
        });
    Some(Circle::new(
        (sx / n).trunc() as i32,
        (sy / n).trunc() as i32,
        (sr / n).trunc() as i32,
    ))
}

//! Needle tip selection and the pointing angle of a dial offset.
//!
//! Angles are in degrees, 0° straight down from the dial center and growing
//! clockwise on screen: left is 90°, up is 180°, right is 270°.

use serde::{Deserialize, Serialize};

use crate::geometry::{distance, reference_angle_rad, Circle, LineSegment, Point};

/// The tip of the needle coincides with the dial center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleError {
    TipAtCenter,
}

impl std::fmt::Display for AngleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TipAtCenter => write!(f, "needle tip coincides with the dial center"),
        }
    }
}

impl std::error::Error for AngleError {}

/// Position of an offset relative to the dial center.
///
/// `dy` is measured upward (`center.y - point.y`), so "up" means toward the
/// top of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    UpRight,
    UpLeft,
    DownLeft,
    DownRight,
    OnAxisUp,
    OnAxisDown,
    OnAxisLeft,
    OnAxisRight,
    Center,
}

impl Quadrant {
    pub fn classify(dx: f64, dy: f64) -> Self {
        use std::cmp::Ordering::*;
        match (
            dx.partial_cmp(&0.0).unwrap_or(Equal),
            dy.partial_cmp(&0.0).unwrap_or(Equal),
        ) {
            (Greater, Greater) => Self::UpRight,
            (Less, Greater) => Self::UpLeft,
            (Less, Less) => Self::DownLeft,
            (Greater, Less) => Self::DownRight,
            (Equal, Greater) => Self::OnAxisUp,
            (Equal, Less) => Self::OnAxisDown,
            (Less, Equal) => Self::OnAxisLeft,
            (Greater, Equal) => Self::OnAxisRight,
            (Equal, Equal) => Self::Center,
        }
    }
}

/// Gauge angle of the offset `(dx, dy)` (`dy` upward).
pub fn offset_angle(dx: f64, dy: f64) -> Result<f64, AngleError> {
    let deg = || reference_angle_rad(dx, dy).to_degrees();
    match Quadrant::classify(dx, dy) {
        Quadrant::UpRight | Quadrant::DownRight => Ok(270.0 - deg()),
        Quadrant::UpLeft | Quadrant::DownLeft => Ok(90.0 - deg()),
        Quadrant::OnAxisUp => Ok(180.0),
        Quadrant::OnAxisLeft => Ok(90.0),
        Quadrant::OnAxisRight => Ok(270.0),
        Quadrant::OnAxisDown => Ok(0.0),
        Quadrant::Center => Err(AngleError::TipAtCenter),
    }
}

/// Endpoint of `segment` farther from the dial center. Equal distances pick
/// the second endpoint.
pub fn needle_tip(segment: &LineSegment, dial: &Circle) -> Point {
    let center = dial.center();
    let (a, b) = (segment.start(), segment.end());
    if distance(center, a) > distance(center, b) {
        a
    } else {
        b
    }
}

/// Pointing angle of the needle in degrees, in `[0, 360)`.
pub fn needle_angle(segment: &LineSegment, dial: &Circle) -> Result<f64, AngleError> {
    let tip = needle_tip(segment, dial);
    let center = dial.center();
    offset_angle(tip.x - center.x, center.y - tip.y)
}

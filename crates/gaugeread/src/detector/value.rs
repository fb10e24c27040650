//! Angular scale span and the linear angle → value mapping.

use serde::{Deserialize, Serialize};

/// Errors raised when constructing an [`AngleRange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleRangeError {
    /// A bound is NaN or infinite.
    NonFinite { min_angle: f64, max_angle: f64 },
    /// Both bounds are equal, so no angle can be interpolated.
    ZeroSpan { angle: f64 },
}

impl std::fmt::Display for AngleRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite {
                min_angle,
                max_angle,
            } => write!(
                f,
                "angle range bounds must be finite, got [{}, {}]",
                min_angle, max_angle
            ),
            Self::ZeroSpan { angle } => {
                write!(f, "angle range has zero span (both bounds {})", angle)
            }
        }
    }
}

impl std::error::Error for AngleRangeError {}

/// Angular span covered by the printed scale, in degrees.
///
/// 0° is straight down from the dial center and angles grow clockwise as
/// seen on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min_angle: f64,
    pub max_angle: f64,
}

impl AngleRange {
    pub fn new(min_angle: f64, max_angle: f64) -> Result<Self, AngleRangeError> {
        let range = Self {
            min_angle,
            max_angle,
        };
        range.validate()?;
        Ok(range)
    }

    /// Re-check the construction invariants (deserialized values skip `new`).
    pub fn validate(&self) -> Result<(), AngleRangeError> {
        if !self.min_angle.is_finite() || !self.max_angle.is_finite() {
            return Err(AngleRangeError::NonFinite {
                min_angle: self.min_angle,
                max_angle: self.max_angle,
            });
        }
        if self.min_angle == self.max_angle {
            return Err(AngleRangeError::ZeroSpan {
                angle: self.min_angle,
            });
        }
        Ok(())
    }

    pub fn span(&self) -> f64 {
        self.max_angle - self.min_angle
    }
}

/// Physical values at the two ends of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min_value: f64,
    pub max_value: f64,
}

impl ValueRange {
    pub fn new(min_value: f64, max_value: f64) -> Self {
        Self {
            min_value,
            max_value,
        }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// Linearly map a needle angle onto the value range.
///
/// Angles outside the scale extrapolate; nothing is clamped. The boundaries
/// map exactly: `min_angle → min_value`, `max_angle → max_value`.
pub fn map_value(angle: f64, angle_range: &AngleRange, value_range: &ValueRange) -> f64 {
    let t = (angle - angle_range.min_angle) / angle_range.span();
    value_range.min_value * (1.0 - t) + value_range.max_value * t
}

use crate::detector::{AngleError, AngleRange, AngleRangeError};
use crate::geometry::{Circle, LineSegment};

/// Where the scale span used for a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSource {
    /// Supplied by configuration.
    Manual,
    /// At least one bound was found from scale ticks in the image.
    Detected,
    /// No tick qualified; the seeded span was used.
    Default,
}

/// Full reading for a single image.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GaugeReading {
    /// Measured value in the units of the configured value range.
    pub value: f64,
    /// Needle angle in degrees (0 = straight down, clockwise).
    pub needle_angle: f64,
    pub dial: Circle,
    pub needle: LineSegment,
    /// Scale span the value was interpolated over.
    pub angle_range: AngleRange,
    pub range_source: RangeSource,
    /// Image dimensions [width, height].
    pub image_size: [u32; 2],
}

/// Reasons a gauge could not be read.
#[derive(Debug)]
pub enum ReadError {
    /// No circle candidate in the dial radius band.
    DialNotFound,
    /// No line segment fits the needle windows.
    NeedleNotFound,
    /// The needle geometry admits no angle.
    DegenerateGeometry(AngleError),
    /// The configured or estimated scale span is unusable.
    InvalidAngleRange(AngleRangeError),
    /// The configuration failed validation.
    InvalidConfig(String),
    /// The image could not be loaded.
    Image(image::ImageError),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DialNotFound => write!(f, "dial not found"),
            Self::NeedleNotFound => write!(f, "needle not found"),
            Self::DegenerateGeometry(e) => write!(f, "degenerate needle geometry: {}", e),
            Self::InvalidAngleRange(e) => write!(f, "invalid angle range: {}", e),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Self::Image(e) => write!(f, "failed to load image: {}", e),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DegenerateGeometry(e) => Some(e),
            Self::InvalidAngleRange(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AngleError> for ReadError {
    fn from(e: AngleError) -> Self {
        Self::DegenerateGeometry(e)
    }
}

impl From<AngleRangeError> for ReadError {
    fn from(e: AngleRangeError) -> Self {
        Self::InvalidAngleRange(e)
    }
}

impl From<image::ImageError> for ReadError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

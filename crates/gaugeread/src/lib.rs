//! gaugeread: read analog dial gauges from still images.
//!
//! The pipeline stages are:
//!
//! 1. **Dial** – consensus circle from a circle detector, radius band relative
//!    to the image height.
//! 2. **Scale range** – small tick contours inside the rim narrow the angular
//!    span of the printed scale (or a manual span is taken from config).
//! 3. **Needle** – first line segment on the inverted binary image whose
//!    endpoints fall into radius-relative pivot/tip windows.
//! 4. **Angle** – tip is the farther endpoint; 0° points straight down and
//!    angles grow clockwise.
//! 5. **Value** – linear interpolation of the angle over the scale span.
//!
//! # Public API
//! - [`GaugeReader`] as the primary entry point
//! - [`ReadConfig`] and the per-stage configs for tuning
//! - [`GaugeReading`] / [`ReadError`] results
//! - [`primitives`] traits for plugging in other image backends
//!
//! Pipeline internals are crate-private.

mod annotate;
mod api;
pub mod detector;
pub mod geometry;
mod pipeline;
pub mod primitives;

#[cfg(test)]
pub(crate) mod test_utils;

pub use annotate::{draw_angle_guides, write_angle_guides, GuideConfig};
pub use api::GaugeReader;
pub use detector::{
    AngleError, AngleRange, AngleRangeError, DialConfig, NeedleConfig, ReadConfig,
    ScaleRangeConfig, ScaleRangeEstimate, ValueRange,
};
pub use geometry::{Circle, CircleCandidate, LineSegment, Point};
pub use pipeline::{read_gauge, GaugeReading, RangeSource, ReadError};
pub use primitives::{BuiltinPrimitives, HoughCircleConfig, LineDetectParams, Primitives};

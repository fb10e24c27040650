//! Gauge geometry stages (dial, scale range, needle, angle, value) independent
//! of orchestration.
//!
//! The `pipeline` module owns the call order. Every stage here takes its
//! image primitives as trait objects and returns plain values.

pub(crate) mod angle;
pub(crate) mod config;
pub(crate) mod dial;
pub(crate) mod needle;
pub(crate) mod scale_range;
pub(crate) mod value;

pub use angle::{needle_angle, needle_tip, offset_angle, AngleError, Quadrant};
pub use config::{DialConfig, NeedleConfig, ReadConfig, ScaleRangeConfig};
pub use dial::locate_dial;
pub use needle::locate_needle;
pub use scale_range::{detect_scale_range, ScaleRangeEstimate};
pub use value::{map_value, AngleRange, AngleRangeError, ValueRange};

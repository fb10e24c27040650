//! High-level reading pipeline.
//!
//! This module is the glue layer that wires the detector stages together:
//! dial -> scale range (or manual range) -> needle -> angle -> value.
//!
//! Stage algorithms live in `crate::detector`; image primitives are supplied
//! through `crate::primitives::Primitives`.

mod result;
mod run;

pub use result::{GaugeReading, RangeSource, ReadError};
pub use run::read_gauge;

//! High-level reading API.
//!
//! [`GaugeReader`] is the primary entry point. It wraps a [`ReadConfig`] and
//! runs the pipeline with the built-in primitives, or with caller-supplied
//! ones via [`GaugeReader::read_with`].

use image::GrayImage;
use std::path::Path;

use crate::detector::{locate_dial, ReadConfig, ValueRange};
use crate::geometry::Circle;
use crate::pipeline::{self, GaugeReading, ReadError};
use crate::primitives::{BuiltinPrimitives, Primitives};

/// Primary reading interface.
///
/// Create once, read many images.
///
/// # Examples
///
/// ```no_run
/// use gaugeread::{GaugeReader, ValueRange};
/// use std::path::Path;
///
/// let reader = GaugeReader::new(ValueRange::new(-20.0, 120.0));
/// match reader.read_path(Path::new("gauge.jpg")) {
///     Ok(reading) => println!("{:.1}", reading.value),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub struct GaugeReader {
    config: ReadConfig,
}

impl GaugeReader {
    /// Create a reader with default tuning for the given value range.
    pub fn new(value_range: ValueRange) -> Self {
        Self {
            config: ReadConfig::with_value_range(value_range),
        }
    }

    /// Create with full config control.
    pub fn with_config(config: ReadConfig) -> Self {
        Self { config }
    }

    /// Load a JSON config and create a reader in one step.
    pub fn from_config_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(ReadConfig::from_json_file(path)?))
    }

    /// Access the current configuration.
    pub fn config(&self) -> &ReadConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut ReadConfig {
        &mut self.config
    }

    fn builtins(&self) -> BuiltinPrimitives {
        BuiltinPrimitives::new(self.config.circle_detector.clone(), self.config.line_seed)
    }

    /// Read a grayscale image with the built-in primitives.
    pub fn read(&self, image: &GrayImage) -> Result<GaugeReading, ReadError> {
        let builtins = self.builtins();
        self.read_with(image, &builtins.as_primitives())
    }

    /// Read with caller-supplied primitives.
    pub fn read_with(
        &self,
        image: &GrayImage,
        primitives: &Primitives<'_>,
    ) -> Result<GaugeReading, ReadError> {
        pipeline::read_gauge(image, &self.config, primitives)
    }

    /// Load an image file, convert it to grayscale and read it.
    pub fn read_path(&self, path: &Path) -> Result<GaugeReading, ReadError> {
        let gray = image::open(path)?.to_luma8();
        tracing::debug!(
            "loaded {} ({}x{})",
            path.display(),
            gray.width(),
            gray.height()
        );
        self.read(&gray)
    }

    /// Locate only the dial, e.g. to draw angle guides for manual calibration.
    pub fn locate_dial(&self, image: &GrayImage) -> Option<Circle> {
        let builtins = self.builtins();
        locate_dial(image, &self.config.dial, &builtins.circles)
    }
}

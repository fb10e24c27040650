//! Top-level orchestrator: dial → scale range → needle → angle → value.

use image::GrayImage;

use super::result::{GaugeReading, RangeSource, ReadError};
use crate::detector::{
    detect_scale_range, locate_dial, locate_needle, map_value, needle_angle, AngleRange,
    ReadConfig,
};
use crate::geometry::Circle;
use crate::primitives::Primitives;

fn resolve_angle_range(
    gray: &GrayImage,
    dial: &Circle,
    config: &ReadConfig,
    primitives: &Primitives<'_>,
) -> Result<(AngleRange, RangeSource), ReadError> {
    if let Some(manual) = config.angle_range {
        return Ok((manual, RangeSource::Manual));
    }
    let estimate = detect_scale_range(
        gray,
        dial,
        &config.scale_range,
        primitives.edges,
        primitives.contours,
    );
    let source = if estimate.is_default() {
        tracing::warn!(
            "no scale ticks found, using default range [{}, {}]",
            estimate.min_angle,
            estimate.max_angle
        );
        RangeSource::Default
    } else {
        RangeSource::Detected
    };
    Ok((estimate.angle_range()?, source))
}

/// Read one grayscale gauge image.
///
/// Dial and needle detection failures are terminal for the image; nothing is
/// retried with other parameters.
pub fn read_gauge(
    gray: &GrayImage,
    config: &ReadConfig,
    primitives: &Primitives<'_>,
) -> Result<GaugeReading, ReadError> {
    config.validate().map_err(ReadError::InvalidConfig)?;
    let (w, h) = gray.dimensions();

    let Some(dial) = locate_dial(gray, &config.dial, primitives.circles) else {
        tracing::warn!("dial not found in {}x{} image", w, h);
        return Err(ReadError::DialNotFound);
    };

    let (angle_range, range_source) = resolve_angle_range(gray, &dial, config, primitives)?;

    let Some(needle) = locate_needle(
        gray,
        &dial,
        &config.needle,
        primitives.binarizer,
        primitives.lines,
    ) else {
        tracing::warn!("needle not found");
        return Err(ReadError::NeedleNotFound);
    };

    let angle = needle_angle(&needle, &dial)?;
    let value = map_value(angle, &angle_range, &config.value_range);
    tracing::info!(
        "needle at {:.2} deg over [{:.1}, {:.1}] ({:?}) -> {:.3}",
        angle,
        angle_range.min_angle,
        angle_range.max_angle,
        range_source,
        value
    );

    Ok(GaugeReading {
        value,
        needle_angle: angle,
        dial,
        needle,
        angle_range,
        range_source,
        image_size: [w, h],
    })
}

//! Angle guides drawn around a located dial.
//!
//! The guides let an operator read off the scale span by eye and pass it back
//! as a manual angle range. Ticks are placed in the image frame (angle 0 to the
//! right, growing clockwise); labels are shifted by a quarter turn so that
//! label 0 sits straight below the center, matching gauge angles.

use std::path::Path;

use ab_glyph::{Font, PxScale};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};

use crate::geometry::Circle;

/// Layout of the angle guides.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Number of guide ticks.
    pub ticks: u32,
    /// Angular spacing between ticks (degrees).
    pub spacing_deg: f64,
    /// Inner end of each tick as a fraction of the radius (outer end is r).
    pub tick_inner_frac: f64,
    /// Label distance from the center as a fraction of the radius.
    pub label_radius_frac: f64,
    /// Pixel offset applied to every label origin.
    pub label_offset: [i32; 2],
    /// Label height in pixels.
    pub font_px: f32,
    pub color: [u8; 3],
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            ticks: 36,
            spacing_deg: 10.0,
            tick_inner_frac: 0.9,
            label_radius_frac: 1.2,
            label_offset: [-10, 5],
            font_px: 16.0,
            color: [0, 255, 0],
        }
    }
}

fn polar(dial: &Circle, rho: f64, deg: f64) -> (f32, f32) {
    let t = deg.to_radians();
    (
        (dial.center_x as f64 + rho * t.cos()) as f32,
        (dial.center_y as f64 + rho * t.sin()) as f32,
    )
}

/// Draw guide ticks, and labels when a font is given, onto `canvas`.
pub fn draw_angle_guides<F: Font>(
    canvas: &mut RgbImage,
    dial: &Circle,
    config: &GuideConfig,
    font: Option<&F>,
) {
    let color = Rgb(config.color);
    let r = dial.radius as f64;
    let scale = PxScale::from(config.font_px);
    for i in 0..config.ticks {
        let deg = config.spacing_deg * i as f64;
        let (x0, y0) = polar(dial, config.tick_inner_frac * r, deg);
        let (x1, y1) = polar(dial, r, deg);
        // Two passes one pixel apart give a 2 px stroke.
        draw_line_segment_mut(canvas, (x0, y0), (x1, y1), color);
        draw_line_segment_mut(canvas, (x0 + 1.0, y0), (x1 + 1.0, y1), color);

        if let Some(font) = font {
            let (lx, ly) = polar(dial, config.label_radius_frac * r, deg + 90.0);
            draw_text_mut(
                canvas,
                color,
                lx as i32 + config.label_offset[0],
                ly as i32 + config.label_offset[1],
                scale,
                font,
                &format!("{}", deg as i64),
            );
        }
    }
}

/// Render the guides over a grayscale image and save the result to `path`.
pub fn write_angle_guides<F: Font>(
    gray: &GrayImage,
    dial: &Circle,
    config: &GuideConfig,
    font: Option<&F>,
    path: &Path,
) -> Result<(), image::ImageError> {
    let mut canvas: RgbImage = image::DynamicImage::ImageLuma8(gray.clone()).to_rgb8();
    draw_angle_guides(&mut canvas, dial, config, font);
    canvas.save(path)?;
    tracing::info!("wrote angle guides to {}", path.display());
    Ok(())
}

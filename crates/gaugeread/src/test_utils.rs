//! Shared test utilities for image-based unit tests.

use image::{GrayImage, Luma};

/// Render a synthetic annular ring image.
///
/// Pixels at distance `d` from `center` satisfy:
/// - `ring_pix`  if `inner_radius <= d <= outer_radius`
/// - `bg_pix`    otherwise
pub(crate) fn draw_ring_image(
    w: u32,
    h: u32,
    center: [f32; 2],
    outer_radius: f32,
    inner_radius: f32,
    ring_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - center[0];
            let dy = y as f32 - center[1];
            let d = (dx * dx + dy * dy).sqrt();
            let pix = if d >= inner_radius && d <= outer_radius {
                ring_pix
            } else {
                bg_pix
            };
            img.put_pixel(x, y, Luma([pix]));
        }
    }
    img
}

/// Paint every pixel within `thickness / 2` of the segment `a`–`b`.
pub(crate) fn draw_thick_segment(
    img: &mut GrayImage,
    a: (f32, f32),
    b: (f32, f32),
    thickness: f32,
    value: u8,
) {
    let half = thickness * 0.5;
    let (w, h) = img.dimensions();
    let (vx, vy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = (vx * vx + vy * vy).max(1e-12);
    for y in 0..h {
        for x in 0..w {
            let (px, py) = (x as f32 - a.0, y as f32 - a.1);
            let t = ((px * vx + py * vy) / len_sq).clamp(0.0, 1.0);
            let (ex, ey) = (px - t * vx, py - t * vy);
            if (ex * ex + ey * ey).sqrt() <= half {
                img.put_pixel(x, y, Luma([value]));
            }
        }
    }
}

/// Unit image-frame direction of a gauge angle (0 = straight down,
/// increasing clockwise on screen).
pub(crate) fn gauge_direction(angle_deg: f32) -> (f32, f32) {
    let a = angle_deg.to_radians();
    (-a.sin(), a.cos())
}

/// A dark-on-light synthetic gauge: thin rim at `radius` and a needle from
/// 0.25r to 0.85r pointing at `needle_deg`.
pub(crate) struct SyntheticGauge {
    pub width: u32,
    pub height: u32,
    pub center: [f32; 2],
    pub radius: f32,
    pub needle_deg: f32,
}

impl SyntheticGauge {
    pub(crate) fn render(&self) -> GrayImage {
        let mut img = draw_ring_image(
            self.width,
            self.height,
            self.center,
            self.radius + 1.5,
            self.radius - 1.5,
            30,
            200,
        );
        let (ux, uy) = gauge_direction(self.needle_deg);
        let [cx, cy] = self.center;
        let inner = 0.25 * self.radius;
        let outer = 0.85 * self.radius;
        draw_thick_segment(
            &mut img,
            (cx + ux * inner, cy + uy * inner),
            (cx + ux * outer, cy + uy * outer),
            5.0,
            30,
        );
        img
    }

    /// Render with radial tick strokes from 0.7r to 0.9r at each angle in
    /// `ticks_deg`, 3 px wide, in rim ink.
    pub(crate) fn render_with_ticks(&self, ticks_deg: &[f32]) -> GrayImage {
        let mut img = self.render();
        let [cx, cy] = self.center;
        let (inner, outer) = (0.7 * self.radius, 0.9 * self.radius);
        for &deg in ticks_deg {
            let (ux, uy) = gauge_direction(deg);
            draw_thick_segment(
                &mut img,
                (cx + ux * inner, cy + uy * inner),
                (cx + ux * outer, cy + uy * outer),
                3.0,
                30,
            );
        }
        img
    }
}

/// Scale ticks every 22.5 degrees from 45 to 315, without the one under a
/// needle pointing straight up.
pub(crate) fn scale_ticks_around_upright_needle() -> Vec<f32> {
    (0..13)
        .map(|i| 45.0 + 22.5 * i as f32)
        .filter(|&deg| deg != 180.0)
        .collect()
}

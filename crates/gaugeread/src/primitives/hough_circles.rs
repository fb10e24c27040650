//! Gradient-voting Hough transform for circle candidates.
//!
//! Every Canny edge pixel votes along both directions of its Scharr gradient
//! at each radius of the search band. Edge pixels on a circle all point at its
//! center, so the smoothed accumulator peaks there. Each accepted peak then
//! picks the radius with the strongest edge support.

use image::{GrayImage, ImageBuffer, Luma};

use super::CircleDetector;
use crate::geometry::CircleCandidate;

/// Tuning for [`HoughCircleDetector`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HoughCircleConfig {
    /// Upper Canny threshold used to select voting pixels (lower is half).
    pub canny_high: f32,
    /// Gaussian sigma for accumulator smoothing.
    pub accum_sigma: f32,
    /// Minimum accumulator peak for a center (fraction of the global max).
    pub min_vote_frac: f32,
    /// Minimum edge support at the chosen radius, as a fraction of the
    /// circumference `2πr`.
    pub min_support_frac: f32,
    /// Optional cap on the number of candidates returned.
    pub max_candidates: Option<usize>,
}

impl Default for HoughCircleConfig {
    fn default() -> Self {
        Self {
            canny_high: 100.0,
            accum_sigma: 2.0,
            min_vote_frac: 0.5,
            min_support_frac: 0.25,
            max_candidates: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HoughCircleDetector {
    pub config: HoughCircleConfig,
}

impl HoughCircleDetector {
    pub fn new(config: HoughCircleConfig) -> Self {
        Self { config }
    }
}

impl CircleDetector for HoughCircleDetector {
    fn detect(
        &self,
        gray: &GrayImage,
        radius_min: u32,
        radius_max: u32,
        min_separation: f32,
    ) -> Vec<CircleCandidate> {
        find_circles(gray, radius_min, radius_max, min_separation, &self.config)
    }
}

/// Deposit a weighted vote into the accumulator using bilinear interpolation.
#[inline]
fn bilinear_add_in_bounds(accum: &mut [f32], stride: usize, x: f32, y: f32, weight: f32) {
    let x0 = x as usize;
    let y0 = y as usize;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let base = y0 * stride + x0;
    accum[base] += weight * (1.0 - fx) * (1.0 - fy);
    accum[base + 1] += weight * fx * (1.0 - fy);
    accum[base + stride] += weight * (1.0 - fx) * fy;
    accum[base + stride + 1] += weight * fx * fy;
}

fn find_circles(
    gray: &GrayImage,
    radius_min: u32,
    radius_max: u32,
    min_separation: f32,
    config: &HoughCircleConfig,
) -> Vec<CircleCandidate> {
    let (w, h) = gray.dimensions();
    if w < 4 || h < 4 || radius_max < radius_min || radius_max == 0 {
        return Vec::new();
    }
    if !(config.accum_sigma > 0.0 && config.accum_sigma.is_finite()) {
        tracing::warn!(
            "circle detection skipped: accum_sigma {} must be finite and > 0",
            config.accum_sigma
        );
        return Vec::new();
    }

    let edges = imageproc::edges::canny(gray, config.canny_high * 0.5, config.canny_high);
    let gx = imageproc::gradients::horizontal_scharr(gray);
    let gy = imageproc::gradients::vertical_scharr(gray);
    let gx_raw = gx.as_raw();
    let gy_raw = gy.as_raw();

    let stride = w as usize;
    let mut edge_points: Vec<(f32, f32)> = Vec::new();
    let mut accum = vec![0.0f32; stride * h as usize];
    let x_limit = (w - 1) as f32;
    let y_limit = (h - 1) as f32;
    let r_lo = radius_min.max(1);

    for (x, y, p) in edges.enumerate_pixels() {
        if p[0] == 0 {
            continue;
        }
        let idx = y as usize * stride + x as usize;
        let gxv = gx_raw[idx] as f32;
        let gyv = gy_raw[idx] as f32;
        let mag = (gxv * gxv + gyv * gyv).sqrt();
        if mag < 1e-6 {
            continue;
        }
        let (xf, yf) = (x as f32, y as f32);
        edge_points.push((xf, yf));

        let dx = gxv / mag;
        let dy = gyv / mag;
        for r in r_lo..=radius_max {
            let r = r as f32;
            for sign in [1.0f32, -1.0] {
                let vx = xf + sign * dx * r;
                let vy = yf + sign * dy * r;
                if vx >= 0.0 && vx < x_limit && vy >= 0.0 && vy < y_limit {
                    bilinear_add_in_bounds(&mut accum, stride, vx, vy, 1.0);
                }
            }
        }
    }
    if edge_points.is_empty() {
        return Vec::new();
    }

    let Some(accum_img) = ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(w, h, accum) else {
        return Vec::new();
    };
    let smoothed = imageproc::filter::gaussian_blur_f32(&accum_img, config.accum_sigma);
    let data = smoothed.as_raw();
    let max_val = data.iter().cloned().fold(0.0f32, f32::max);
    if max_val < 1e-6 {
        return Vec::new();
    }
    let vote_threshold = config.min_vote_frac * max_val;

    // Plain 8-neighbour local maxima; separation is enforced afterwards.
    let mut peaks: Vec<(u32, u32, f32)> = Vec::new();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = y as usize * stride + x as usize;
            let val = data[idx];
            if val < vote_threshold {
                continue;
            }
            let mut is_max = true;
            'nbr: for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    let nidx = ny as usize * stride + nx as usize;
                    if nidx != idx && (data[nidx] > val || (data[nidx] == val && nidx < idx)) {
                        is_max = false;
                        break 'nbr;
                    }
                }
            }
            if is_max {
                peaks.push((x, y, val));
            }
        }
    }
    peaks.sort_by(|a, b| b.2.total_cmp(&a.2));

    let sep_sq = min_separation * min_separation;
    let mut accepted: Vec<CircleCandidate> = Vec::new();
    for (px, py, score) in peaks {
        let (cx, cy) = (px as f32, py as f32);
        let too_close = accepted.iter().any(|c| {
            let ddx = c.x as f32 - cx;
            let ddy = c.y as f32 - cy;
            ddx * ddx + ddy * ddy < sep_sq
        });
        if too_close {
            continue;
        }
        let Some((radius, support)) = best_radius(&edge_points, cx, cy, r_lo, radius_max) else {
            continue;
        };
        let needed = config.min_support_frac * std::f32::consts::TAU * radius as f32;
        if (support as f32) < needed {
            tracing::debug!(
                "circle candidate ({}, {}) r={} rejected: support {} < {:.1}",
                px,
                py,
                radius,
                support,
                needed
            );
            continue;
        }
        tracing::debug!(
            "circle candidate ({}, {}) r={} score={:.1} support={}",
            px,
            py,
            radius,
            score,
            support
        );
        accepted.push(CircleCandidate::new(cx as f64, cy as f64, radius as f64));
        if config.max_candidates.is_some_and(|cap| accepted.len() >= cap) {
            break;
        }
    }
    accepted
}

/// Radius in `[r_min, r_max]` with the most edge pixels within ±1 px, and that count.
fn best_radius(
    edge_points: &[(f32, f32)],
    cx: f32,
    cy: f32,
    r_min: u32,
    r_max: u32,
) -> Option<(u32, usize)> {
    let n_bins = (r_max + 2) as usize;
    let mut hist = vec![0usize; n_bins];
    for &(x, y) in edge_points {
        let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt().round() as usize;
        if d < n_bins {
            hist[d] += 1;
        }
    }
    (r_min..=r_max)
        .map(|r| {
            let r_us = r as usize;
            let support = hist[r_us - 1] + hist[r_us] + hist[r_us + 1];
            (r, support)
        })
        .fold(None, |best: Option<(u32, usize)>, cur| match best {
            Some(b) if b.1 >= cur.1 => Some(b),
            _ => Some(cur),
        })
        .filter(|&(_, support)| support > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::draw_ring_image;

    #[test]
    fn blank_image_has_no_circles() {
        let img = GrayImage::from_pixel(120, 120, Luma([200]));
        let found = HoughCircleDetector::default().detect(&img, 30, 60, 20.0);
        assert!(found.is_empty());
    }

    #[test]
    fn degenerate_band_returns_nothing() {
        let img = draw_ring_image(200, 200, [100.0, 100.0], 81.5, 78.5, 30, 200);
        let found = HoughCircleDetector::default().detect(&img, 90, 70, 20.0);
        assert!(found.is_empty());
    }

    #[test]
    fn non_positive_sigma_finds_nothing() {
        let img = draw_ring_image(200, 200, [100.0, 100.0], 81.5, 78.5, 30, 200);
        let det = HoughCircleDetector::new(HoughCircleConfig {
            accum_sigma: 0.0,
            ..Default::default()
        });
        assert!(det.detect(&img, 70, 100, 20.0).is_empty());
    }

    #[test]
    fn finds_single_dark_ring() {
        let img = draw_ring_image(200, 200, [100.0, 100.0], 81.5, 78.5, 30, 200);
        let found = HoughCircleDetector::default().detect(&img, 70, 100, 20.0);
        assert!(!found.is_empty(), "should find the ring");
        let best = found[0];
        assert!(
            (best.x - 100.0).abs() <= 3.0 && (best.y - 100.0).abs() <= 3.0,
            "center ({}, {}) too far from (100, 100)",
            best.x,
            best.y
        );
        assert!(
            (best.radius - 80.0).abs() <= 4.0,
            "radius {} too far from 80",
            best.radius
        );
    }

    #[test]
    fn best_radius_prefers_densest_shell() {
        let mut pts = Vec::new();
        for k in 0..90 {
            let t = k as f32 * std::f32::consts::TAU / 90.0;
            pts.push((50.0 + 20.0 * t.cos(), 50.0 + 20.0 * t.sin()));
        }
        for k in 0..10 {
            let t = k as f32 * std::f32::consts::TAU / 10.0;
            pts.push((50.0 + 30.0 * t.cos(), 50.0 + 30.0 * t.sin()));
        }
        let (r, support) = best_radius(&pts, 50.0, 50.0, 10, 40).expect("support");
        assert!((19..=21).contains(&r));
        assert_eq!(support, 90);
    }
}

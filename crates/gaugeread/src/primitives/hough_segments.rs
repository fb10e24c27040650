//! Progressive probabilistic Hough transform for line segments.
//!
//! Foreground pixels are visited in a seeded random order. Each pixel votes
//! for every (rho, theta) line through it; once a line collects `threshold`
//! votes, the segment is traced from that pixel in both directions along the
//! line, tolerating at most `max_line_gap` missing pixels. Traced pixels are
//! removed so they cannot contribute to later segments.

use image::GrayImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::LineSegmentDetector;
use crate::geometry::LineSegment;

/// Parameters of one line-segment detection run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LineDetectParams {
    /// Distance resolution of the accumulator (pixels).
    pub rho: f32,
    /// Angle resolution of the accumulator (degrees).
    pub theta_deg: f32,
    /// Minimum accumulator votes before a segment is traced.
    pub threshold: u32,
    /// Minimum x- or y-extent of an accepted segment (pixels).
    pub min_line_length: u32,
    /// Maximum run of missing pixels bridged while tracing.
    pub max_line_gap: u32,
    /// Optional cap on the number of segments returned.
    pub max_lines: Option<usize>,
}

impl LineDetectParams {
    /// Finest accepted distance resolution. Finer bins make the accumulator
    /// grow without bound.
    pub const MIN_RHO: f32 = 0.1;

    /// Resolutions the accumulator can be built from.
    pub fn has_usable_resolution(&self) -> bool {
        self.rho >= Self::MIN_RHO
            && self.rho.is_finite()
            && self.theta_deg > 0.0
            && self.theta_deg <= 180.0
    }
}

impl Default for LineDetectParams {
    fn default() -> Self {
        Self {
            rho: 3.0,
            theta_deg: 1.0,
            threshold: 100,
            min_line_length: 10,
            max_line_gap: 0,
            max_lines: None,
        }
    }
}

/// Probabilistic Hough segment detector. Results are deterministic for a
/// given seed.
#[derive(Debug, Clone)]
pub struct ProbabilisticHoughLines {
    pub seed: u64,
}

impl ProbabilisticHoughLines {
    pub const DEFAULT_SEED: u64 = 0x5eed_1e55;

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for ProbabilisticHoughLines {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl LineSegmentDetector for ProbabilisticHoughLines {
    fn detect_lines(&self, binary: &GrayImage, params: &LineDetectParams) -> Vec<LineSegment> {
        detect_segments(binary, params, self.seed)
    }
}

struct Accumulator {
    votes: Vec<u32>,
    n_rho: usize,
    rho_offset: isize,
    cos_t: Vec<f32>,
    sin_t: Vec<f32>,
}

impl Accumulator {
    fn new(width: u32, height: u32, rho: f32, theta_deg: f32) -> Self {
        let n_angle = ((180.0 / theta_deg).round() as usize).max(1);
        let n_rho = ((((width + height) * 2 + 1) as f32 / rho).round() as usize).max(1);
        let irho = 1.0 / rho;
        let step = theta_deg.to_radians();
        let cos_t = (0..n_angle).map(|n| (n as f32 * step).cos() * irho).collect();
        let sin_t = (0..n_angle).map(|n| (n as f32 * step).sin() * irho).collect();
        Self {
            votes: vec![0; n_angle * n_rho],
            n_rho,
            rho_offset: (n_rho as isize - 1) / 2,
            cos_t,
            sin_t,
        }
    }

    fn n_angle(&self) -> usize {
        self.cos_t.len()
    }

    #[inline]
    fn bin(&self, n: usize, x: u32, y: u32) -> usize {
        let r = (x as f32 * self.cos_t[n] + y as f32 * self.sin_t[n]).round() as isize
            + self.rho_offset;
        n * self.n_rho + r.clamp(0, self.n_rho as isize - 1) as usize
    }

    /// Vote for every angle; returns the strongest angle index and its count.
    fn vote(&mut self, x: u32, y: u32) -> (usize, u32) {
        let mut best = (0usize, 0u32);
        for n in 0..self.n_angle() {
            let b = self.bin(n, x, y);
            self.votes[b] += 1;
            if self.votes[b] > best.1 {
                best = (n, self.votes[b]);
            }
        }
        best
    }

    fn unvote(&mut self, x: u32, y: u32) {
        for n in 0..self.n_angle() {
            let b = self.bin(n, x, y);
            self.votes[b] = self.votes[b].saturating_sub(1);
        }
    }
}

/// Walks a line through a pixel one step at a time along its dominant axis.
#[derive(Clone, Copy)]
struct LineWalk {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
}

impl LineWalk {
    /// Direction `(a, b)` is the line direction; steps are one pixel along
    /// whichever axis dominates.
    fn new(x: u32, y: u32, a: f32, b: f32) -> Self {
        let (dx, dy) = if a.abs() > b.abs() {
            (a.signum(), b / a.abs())
        } else {
            (a / b.abs(), b.signum())
        };
        Self {
            x: x as f32 + 0.5,
            y: y as f32 + 0.5,
            dx,
            dy,
        }
    }

    fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            ..self
        }
    }

    fn pixel(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let px = self.x.floor();
        let py = self.y.floor();
        if px < 0.0 || py < 0.0 || px >= width as f32 || py >= height as f32 {
            return None;
        }
        Some((px as u32, py as u32))
    }

    fn advance(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }
}

fn detect_segments(binary: &GrayImage, params: &LineDetectParams, seed: u64) -> Vec<LineSegment> {
    let (w, h) = binary.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }
    if !params.has_usable_resolution() {
        tracing::warn!(
            "line detection skipped: rho={} theta_deg={} outside accumulator limits",
            params.rho,
            params.theta_deg
        );
        return Vec::new();
    }

    let stride = w as usize;
    let mut mask: Vec<bool> = binary.as_raw().iter().map(|&v| v > 0).collect();
    let mut points: Vec<(u32, u32)> = binary
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] > 0)
        .map(|(x, y, _)| (x, y))
        .collect();
    let mut rng = StdRng::seed_from_u64(seed);
    points.shuffle(&mut rng);

    let mut accum = Accumulator::new(w, h, params.rho, params.theta_deg);
    let theta_step = params.theta_deg.to_radians();
    let mut segments = Vec::new();

    for (x, y) in points {
        if !mask[y as usize * stride + x as usize] {
            continue;
        }
        let (best_n, best_votes) = accum.vote(x, y);
        if best_votes < params.threshold {
            continue;
        }

        // Line direction is perpendicular to the accumulator normal.
        let theta = best_n as f32 * theta_step;
        let start = LineWalk::new(x, y, -theta.sin(), theta.cos());

        let mut ends = [(x, y); 2];
        for (k, end) in ends.iter_mut().enumerate() {
            let mut walk = if k == 0 { start } else { start.reversed() };
            let mut gap = 0u32;
            while let Some((px, py)) = walk.pixel(w, h) {
                if mask[py as usize * stride + px as usize] {
                    gap = 0;
                    *end = (px, py);
                } else {
                    gap += 1;
                    if gap > params.max_line_gap {
                        break;
                    }
                }
                walk.advance();
            }
        }

        let extent_x = (ends[1].0 as i64 - ends[0].0 as i64).unsigned_abs();
        let extent_y = (ends[1].1 as i64 - ends[0].1 as i64).unsigned_abs();
        let good_line = extent_x >= params.min_line_length as u64
            || extent_y >= params.min_line_length as u64;

        // Second pass clears the traced pixels up to each endpoint.
        for (k, end) in ends.iter().enumerate() {
            let mut walk = if k == 0 { start } else { start.reversed() };
            while let Some((px, py)) = walk.pixel(w, h) {
                let idx = py as usize * stride + px as usize;
                if mask[idx] {
                    if good_line {
                        accum.unvote(px, py);
                    }
                    mask[idx] = false;
                }
                if (px, py) == *end {
                    break;
                }
                walk.advance();
            }
        }

        if !good_line {
            continue;
        }
        segments.push(LineSegment::new(
            ends[0].0 as i32,
            ends[0].1 as i32,
            ends[1].0 as i32,
            ends[1].1 as i32,
        ));
        if params.max_lines.is_some_and(|cap| segments.len() >= cap) {
            break;
        }
    }

    segments
}

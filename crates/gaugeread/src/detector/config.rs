use std::path::Path;

use crate::primitives::{HoughCircleConfig, LineDetectParams, ProbabilisticHoughLines};

use super::value::{AngleRange, ValueRange};

/// Dial search: radius band relative to the image height.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DialConfig {
    /// Minimum distance between reported circle centers (pixels).
    pub min_separation_px: f32,
    /// Smallest accepted radius as a fraction of the image height.
    pub radius_min_frac: f64,
    /// Largest accepted radius as a fraction of the image height.
    pub radius_max_frac: f64,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            min_separation_px: 20.0,
            radius_min_frac: 0.35,
            radius_max_frac: 0.5,
        }
    }
}

impl DialConfig {
    /// Radius band in whole pixels for an image of the given height.
    pub fn radius_band(&self, image_height: u32) -> (u32, u32) {
        let h = image_height as f64;
        (
            (h * self.radius_min_frac) as u32,
            (h * self.radius_max_frac) as u32,
        )
    }
}

/// Scale-range estimation from small tick contours near the rim.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScaleRangeConfig {
    /// Number of vertices of the search mask polygon.
    pub mask_vertices: u32,
    /// Angular spacing of the mask vertices (degrees).
    pub vertex_spacing_deg: f64,
    /// Mask radius as a fraction of the dial radius.
    pub mask_radius_frac: f64,
    /// Lower Canny threshold.
    pub canny_low: f32,
    /// Upper Canny threshold.
    pub canny_high: f32,
    /// Contours with an area at or above this value are ignored (px²).
    pub max_contour_area: f64,
    /// Initial `min_angle`, kept when no start tick is found.
    pub start_seed_deg: f64,
    /// Initial `max_angle`, kept when no end tick is found.
    pub end_seed_deg: f64,
    /// Start candidates must lie strictly above this angle.
    pub start_bound_deg: f64,
    /// End candidates must lie strictly below this angle.
    pub end_bound_deg: f64,
}

impl Default for ScaleRangeConfig {
    fn default() -> Self {
        Self {
            mask_vertices: 36,
            vertex_spacing_deg: 10.0,
            mask_radius_frac: 0.8,
            canny_low: 20.0,
            canny_high: 200.0,
            max_contour_area: 15.0,
            start_seed_deg: 90.0,
            end_seed_deg: 270.0,
            start_bound_deg: 35.0,
            end_bound_deg: 330.0,
        }
    }
}

/// Needle search: binarization and radius-relative endpoint windows.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NeedleConfig {
    /// Binarization level; darker pixels become foreground.
    pub binary_threshold: u8,
    /// Parameters passed to the line-segment detector.
    pub lines: LineDetectParams,
    /// Open window for the nearer endpoint, as fractions of the dial radius.
    pub pivot_window: [f64; 2],
    /// Open window for the farther endpoint, as fractions of the dial radius.
    pub tip_window: [f64; 2],
}

impl Default for NeedleConfig {
    fn default() -> Self {
        Self {
            binary_threshold: 175,
            lines: LineDetectParams::default(),
            pivot_window: [0.15, 0.5],
            tip_window: [0.5, 1.0],
        }
    }
}

/// Top-level configuration for reading one gauge image.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReadConfig {
    /// Physical values at the ends of the scale.
    pub value_range: ValueRange,
    /// Manual scale span. When unset the span is estimated from the image.
    pub angle_range: Option<AngleRange>,
    pub dial: DialConfig,
    pub scale_range: ScaleRangeConfig,
    pub needle: NeedleConfig,
    /// Tuning of the built-in circle detector.
    pub circle_detector: HoughCircleConfig,
    /// Seed of the built-in probabilistic line detector.
    pub line_seed: u64,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            value_range: ValueRange::default(),
            angle_range: None,
            dial: DialConfig::default(),
            scale_range: ScaleRangeConfig::default(),
            needle: NeedleConfig::default(),
            circle_detector: HoughCircleConfig::default(),
            line_seed: ProbabilisticHoughLines::DEFAULT_SEED,
        }
    }
}

impl ReadConfig {
    /// Default configuration for the given value range.
    pub fn with_value_range(value_range: ValueRange) -> Self {
        Self {
            value_range,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let config: ReadConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let vr = &self.value_range;
        if !vr.min_value.is_finite() || !vr.max_value.is_finite() {
            return Err("value_range bounds must be finite".to_string());
        }
        if let Some(range) = &self.angle_range {
            range.validate().map_err(|e| e.to_string())?;
        }
        validate_dial(&self.dial)?;
        validate_scale_range(&self.scale_range)?;
        validate_needle(&self.needle)?;
        validate_circle_detector(&self.circle_detector)
    }
}

fn validate_dial(cfg: &DialConfig) -> Result<(), String> {
    if !(cfg.min_separation_px.is_finite() && cfg.min_separation_px >= 0.0) {
        return Err("dial.min_separation_px must be finite and >= 0".to_string());
    }
    if !(cfg.radius_min_frac > 0.0 && cfg.radius_min_frac <= cfg.radius_max_frac) {
        return Err("dial radius fractions must satisfy 0 < min <= max".to_string());
    }
    Ok(())
}

fn validate_scale_range(cfg: &ScaleRangeConfig) -> Result<(), String> {
    if cfg.mask_vertices < 3 {
        return Err("scale_range.mask_vertices must be >= 3".to_string());
    }
    if !(cfg.mask_radius_frac > 0.0) {
        return Err("scale_range.mask_radius_frac must be > 0".to_string());
    }
    if cfg.canny_low > cfg.canny_high {
        return Err("scale_range.canny_low must not exceed canny_high".to_string());
    }
    if !(cfg.start_seed_deg < cfg.end_seed_deg) {
        return Err("scale_range.start_seed_deg must be below end_seed_deg".to_string());
    }
    Ok(())
}

fn validate_needle(cfg: &NeedleConfig) -> Result<(), String> {
    let [p_lo, p_hi] = cfg.pivot_window;
    let [t_lo, t_hi] = cfg.tip_window;
    if !(p_lo >= 0.0 && p_lo < p_hi) || !(t_lo >= 0.0 && t_lo < t_hi) {
        return Err("needle windows must satisfy 0 <= low < high".to_string());
    }
    let lines = &cfg.lines;
    if !(lines.rho >= LineDetectParams::MIN_RHO && lines.rho.is_finite()) {
        return Err(format!(
            "needle.lines.rho must be finite and >= {}",
            LineDetectParams::MIN_RHO
        ));
    }
    if !(lines.theta_deg > 0.0 && lines.theta_deg <= 180.0) {
        return Err("needle.lines.theta_deg must be in (0, 180]".to_string());
    }
    Ok(())
}

fn validate_circle_detector(cfg: &HoughCircleConfig) -> Result<(), String> {
    if !(cfg.canny_high > 0.0 && cfg.canny_high.is_finite()) {
        return Err("circle_detector.canny_high must be finite and > 0".to_string());
    }
    if !(cfg.accum_sigma > 0.0 && cfg.accum_sigma.is_finite()) {
        return Err("circle_detector.accum_sigma must be finite and > 0".to_string());
    }
    for (name, frac) in [
        ("min_vote_frac", cfg.min_vote_frac),
        ("min_support_frac", cfg.min_support_frac),
    ] {
        if !(0.0..=1.0).contains(&frac) {
            return Err(format!("circle_detector.{name} must be in [0, 1]"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ReadConfig::default().validate().is_ok());
    }

    #[test]
    fn radius_band_truncates() {
        let cfg = DialConfig::default();
        assert_eq!(cfg.radius_band(480), (168, 240));
        assert_eq!(cfg.radius_band(101), (35, 50));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ReadConfig = serde_json::from_str(
            r#"{"value_range": {"min_value": -20.0, "max_value": 60.0},
                "needle": {"binary_threshold": 150}}"#,
        )
        .unwrap();
        assert_eq!(cfg.value_range, ValueRange::new(-20.0, 60.0));
        assert_eq!(cfg.needle.binary_threshold, 150);
        assert_eq!(cfg.needle.lines.threshold, 100);
        assert_eq!(cfg.scale_range.mask_vertices, 36);
        assert!(cfg.angle_range.is_none());
    }

    #[test]
    fn rejects_zero_span_manual_range() {
        let cfg = ReadConfig {
            angle_range: Some(AngleRange {
                min_angle: 40.0,
                max_angle: 40.0,
            }),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_windows_and_seeds() {
        let mut cfg = ReadConfig::default();
        cfg.needle.tip_window = [1.0, 0.5];
        assert!(cfg.validate().is_err());

        let mut cfg = ReadConfig::default();
        cfg.scale_range.start_seed_deg = 300.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unusable_circle_detector_tuning() {
        let cfg: ReadConfig =
            serde_json::from_str(r#"{"circle_detector": {"accum_sigma": 0.0}}"#).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("accum_sigma"), "{err}");

        let mut cfg = ReadConfig::default();
        cfg.circle_detector.canny_high = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ReadConfig::default();
        cfg.circle_detector.min_vote_frac = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = ReadConfig::default();
        cfg.circle_detector.min_support_frac = f32::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = ReadConfig::default();
        cfg.circle_detector.min_vote_frac = 1.0;
        cfg.circle_detector.min_support_frac = 0.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_line_resolution_outside_accumulator_limits() {
        let mut cfg = ReadConfig::default();
        cfg.needle.lines.rho = 1e-6;
        assert!(cfg.validate().is_err());

        let mut cfg = ReadConfig::default();
        cfg.needle.lines.theta_deg = 200.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ReadConfig::default();
        cfg.needle.lines.rho = LineDetectParams::MIN_RHO;
        cfg.needle.lines.theta_deg = 180.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn json_round_trip_preserves_manual_range() {
        let cfg = ReadConfig {
            angle_range: Some(AngleRange::new(45.0, 315.0).unwrap()),
            ..Default::default()
        };
        let text = serde_json::to_string(&cfg).unwrap();
        let back: ReadConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.angle_range, cfg.angle_range);
        assert_eq!(back.line_seed, cfg.line_seed);
    }
}

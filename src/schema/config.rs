//! Configuration types for painter runs.

use serde::{Deserialize, Serialize};

/// Interpolation endpoints for one brush-scale bound.
///
/// Stage 0 uses `max`, the last stage uses `min`; the transition follows
/// `(max - min) * (1 - t^2) + min` so most of the shrinking happens late.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushRange {
    pub min: f32,
    pub max: f32,
}

impl BrushRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Value at schedule position `t` in [0, 1].
    ///
    /// Written as a weighted sum so both endpoints are hit exactly.
    #[inline]
    pub fn at(&self, t: f32) -> f32 {
        let w = t * t;
        self.max * (1.0 - w) + self.min * w
    }
}

/// Stage, generation and stroke counts for one `generate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageParams {
    /// Number of stages to run.
    pub stages: usize,
    /// Generations per stage.
    pub generations: usize,
    /// Brushstrokes placed per stage.
    pub strokes: usize,
}

impl Default for StageParams {
    fn default() -> Self {
        Self {
            stages: 20,
            generations: 20,
            strokes: 10,
        }
    }
}

impl StageParams {
    /// Reject zero counts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages == 0 {
            return Err(ConfigError::InvalidStages);
        }
        if self.generations == 0 {
            return Err(ConfigError::InvalidGenerations);
        }
        if self.strokes == 0 {
            return Err(ConfigError::InvalidStrokes);
        }
        Ok(())
    }
}

fn default_uniform_fraction() -> f32 {
    0.2
}
fn default_blur_start() -> f32 {
    0.25
}
fn default_blur_end() -> f32 {
    0.005
}

/// How the per-stage sampling mask evolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingSchedule {
    /// Leading fraction of stages that place strokes uniformly.
    #[serde(default = "default_uniform_fraction")]
    pub uniform_fraction: f32,
    /// Blur (as a fraction of image height) of the first masked stage.
    #[serde(default = "default_blur_start")]
    pub blur_start: f32,
    /// Blur of the last stage.
    #[serde(default = "default_blur_end")]
    pub blur_end: f32,
}

impl Default for SamplingSchedule {
    fn default() -> Self {
        Self {
            uniform_fraction: default_uniform_fraction(),
            blur_start: default_blur_start(),
            blur_end: default_blur_end(),
        }
    }
}

impl SamplingSchedule {
    /// Blur fraction for `stage`, or `None` while placement is still uniform.
    pub fn blur_fraction(&self, stage: usize, total_stages: usize) -> Option<f32> {
        let start_stage = (total_stages as f32 * self.uniform_fraction) as usize;
        if stage < start_stage {
            return None;
        }
        let span = total_stages.saturating_sub(start_stage + 1).max(1);
        let progress = ((stage - start_stage) as f32 / span as f32).min(1.0);
        Some(self.blur_start + (self.blur_end - self.blur_start) * progress)
    }
}

fn default_seed() -> u64 {
    0
}
fn default_brush_ranges() -> [BrushRange; 2] {
    [BrushRange::new(0.1, 0.3), BrushRange::new(0.3, 0.7)]
}
fn default_brush_size() -> usize {
    300
}
fn default_padding_margin() -> usize {
    5
}

/// Top-level painter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainterConfig {
    /// Default stage/generation/stroke counts.
    #[serde(default)]
    pub schedule: StageParams,
    /// Base seed; every random draw derives from it.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Ranges for the lower and upper brush-scale bound.
    #[serde(default = "default_brush_ranges")]
    pub brush_ranges: [BrushRange; 2],
    /// Longest side of the brush template in pixels at scale 1.0.
    #[serde(default = "default_brush_size")]
    pub brush_size: usize,
    /// Extra padding around the canvas beyond half the largest stamp.
    #[serde(default = "default_padding_margin")]
    pub padding_margin: usize,
    /// Sampling mask schedule.
    #[serde(default)]
    pub sampling: SamplingSchedule,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            schedule: StageParams::default(),
            seed: default_seed(),
            brush_ranges: default_brush_ranges(),
            brush_size: default_brush_size(),
            padding_margin: default_padding_margin(),
            sampling: SamplingSchedule::default(),
        }
    }
}

impl PainterConfig {
    /// `(min_scale, max_scale)` for `stage` of `total_stages`.
    pub fn brush_bounds(&self, stage: usize, total_stages: usize) -> (f32, f32) {
        brush_bounds(&self.brush_ranges, stage, total_stages)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule.validate()?;
        validate_brush_ranges(&self.brush_ranges)?;

        if self.brush_size == 0 {
            return Err(ConfigError::InvalidBrushSize);
        }

        let s = &self.sampling;
        if !(0.0..=1.0).contains(&s.uniform_fraction) {
            return Err(ConfigError::InvalidSamplingSchedule(format!(
                "uniform_fraction {} outside [0, 1]",
                s.uniform_fraction
            )));
        }
        if !(s.blur_start >= 0.0 && s.blur_end >= 0.0) {
            return Err(ConfigError::InvalidSamplingSchedule(format!(
                "blur fractions must be non-negative (start {}, end {})",
                s.blur_start, s.blur_end
            )));
        }
        Ok(())
    }
}

/// Interpolate both bounds for `stage` of `total_stages`.
pub fn brush_bounds(ranges: &[BrushRange; 2], stage: usize, total_stages: usize) -> (f32, f32) {
    let t = stage as f32 / total_stages.saturating_sub(1).max(1) as f32;
    (ranges[0].at(t), ranges[1].at(t))
}

/// Check that both ranges are positive and ordered so `lower <= upper` at every stage.
pub fn validate_brush_ranges(ranges: &[BrushRange; 2]) -> Result<(), ConfigError> {
    for (i, r) in ranges.iter().enumerate() {
        if !(r.min > 0.0 && r.min <= r.max && r.max.is_finite()) {
            return Err(ConfigError::InvalidBrushRange(format!(
                "range {} must satisfy 0 < min <= max, got [{}, {}]",
                i, r.min, r.max
            )));
        }
    }
    let (lower, upper) = (ranges[0], ranges[1]);
    if lower.min > upper.min || lower.max > upper.max {
        return Err(ConfigError::InvalidBrushRange(format!(
            "lower bound range [{}, {}] exceeds upper bound range [{}, {}]",
            lower.min, lower.max, upper.min, upper.max
        )));
    }
    Ok(())
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Stage count must be non-zero")]
    InvalidStages,
    #[error("Generation count must be non-zero")]
    InvalidGenerations,
    #[error("Stroke count must be non-zero")]
    InvalidStrokes,
    #[error("Invalid brush range: {0}")]
    InvalidBrushRange(String),
    #[error("Brush size must be non-zero")]
    InvalidBrushSize,
    #[error("Brush template is empty")]
    EmptyBrush,
    #[error("Target image is empty")]
    EmptyTarget,
    #[error("Invalid sampling schedule: {0}")]
    InvalidSamplingSchedule(String),
    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config_valid() {
        assert!(PainterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_brush_bounds_endpoints() {
        let config = PainterConfig::default();

        let first = config.brush_bounds(0, 10);
        assert_eq!(first, (0.3, 0.7));

        let last = config.brush_bounds(9, 10);
        assert_eq!(last, (0.1, 0.3));
    }

    #[test]
    fn test_brush_bounds_single_stage() {
        let config = PainterConfig::default();
        assert_eq!(config.brush_bounds(0, 1), (0.3, 0.7));
    }

    #[test]
    fn test_shrink_concentrated_late() {
        let range = BrushRange::new(0.0, 1.0);
        // Halfway through only a quarter of the shrink has happened.
        assert!((range.at(0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_zero_counts_rejected() {
        let mut params = StageParams::default();
        params.stages = 0;
        assert_eq!(params.validate(), Err(ConfigError::InvalidStages));

        let mut params = StageParams::default();
        params.generations = 0;
        assert_eq!(params.validate(), Err(ConfigError::InvalidGenerations));

        let mut params = StageParams::default();
        params.strokes = 0;
        assert_eq!(params.validate(), Err(ConfigError::InvalidStrokes));
    }

    #[test]
    fn test_invalid_brush_ranges() {
        let inverted = [BrushRange::new(0.3, 0.1), BrushRange::new(0.3, 0.7)];
        assert!(validate_brush_ranges(&inverted).is_err());

        let zero = [BrushRange::new(0.0, 0.3), BrushRange::new(0.3, 0.7)];
        assert!(validate_brush_ranges(&zero).is_err());

        let crossed = [BrushRange::new(0.3, 0.9), BrushRange::new(0.1, 0.5)];
        assert!(validate_brush_ranges(&crossed).is_err());
    }

    #[test]
    fn test_sampling_schedule() {
        let schedule = SamplingSchedule::default();

        // First 20% of 10 stages are uniform.
        assert_eq!(schedule.blur_fraction(0, 10), None);
        assert_eq!(schedule.blur_fraction(1, 10), None);

        let first = schedule.blur_fraction(2, 10).unwrap();
        let last = schedule.blur_fraction(9, 10).unwrap();
        assert!((first - 0.25).abs() < 1e-6);
        assert!((last - 0.005).abs() < 1e-6);

        let mut previous = f32::INFINITY;
        for stage in 2..10 {
            let blur = schedule.blur_fraction(stage, 10).unwrap();
            assert!(blur < previous);
            previous = blur;
        }
    }

    #[test]
    fn test_sampling_schedule_short_runs() {
        let schedule = SamplingSchedule::default();
        // One stage: 20% of 1 truncates to 0, so stage 0 is already masked.
        assert!(schedule.blur_fraction(0, 1).is_some());
    }

    #[test]
    fn test_serialization() {
        let config = PainterConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PainterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: PainterConfig =
            serde_json::from_str(r#"{ "seed": 7, "schedule": { "stages": 3, "generations": 2, "strokes": 4 } }"#)
                .unwrap();
        assert_eq!(parsed.seed, 7);
        assert_eq!(parsed.schedule.stages, 3);
        assert_eq!(parsed.brush_size, 300);
        assert_eq!(parsed.sampling, SamplingSchedule::default());
    }

    proptest! {
        #[test]
        fn prop_bounds_ordered_and_within_ranges(
            lo_min in 0.01f32..0.5,
            lo_span in 0.0f32..0.5,
            up_extra_min in 0.0f32..0.3,
            up_extra_max in 0.0f32..0.3,
            total in 1usize..50,
            stage_frac in 0.0f64..1.0,
        ) {
            let lower = BrushRange::new(lo_min, lo_min + lo_span);
            let upper = BrushRange::new(lo_min + up_extra_min, lo_min + lo_span + up_extra_max);
            prop_assume!(upper.min <= upper.max);
            let ranges = [lower, upper];
            prop_assert!(validate_brush_ranges(&ranges).is_ok());

            let stage = ((total - 1) as f64 * stage_frac) as usize;
            let (lo, hi) = brush_bounds(&ranges, stage, total);
            prop_assert!(lo <= hi + 1e-6);
            prop_assert!(lo >= lower.min - 1e-6 && lo <= lower.max + 1e-6);
            prop_assert!(hi >= upper.min - 1e-6 && hi <= upper.max + 1e-6);
        }
    }
}

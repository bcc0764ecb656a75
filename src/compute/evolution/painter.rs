//! Multi-stage scheduler: anneals brush scale and placement bias across
//! stages and carries the canvas forward from one stage to the next.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use crate::compute::{
    Brush, Canvas, GradientField, Grid, SamplingError, SamplingField, SamplingStrategy,
    mean_error,
};
use crate::error::PaintError;
use crate::schema::{
    BrushRange, ConfigError, MaskKind, PaintHistory, PaintProgress, PainterConfig, StageParams,
    StageStats, StopReason, validate_brush_ranges,
};

use super::optimizer::{StrokeOptimizer, generation_seed};
use super::rng::derive_seed;

/// Paints a target by running one [`StrokeOptimizer`] per stage.
pub struct Painter {
    config: PainterConfig,
    target: Canvas,
    target_grid: Grid,
    brush: Brush,
    gradient: GradientField,
    /// Index 0 is the blank canvas; one entry per completed stage after that.
    buffer: Vec<Canvas>,
    /// Weighted stages' sampling fields as images, keyed by buffer index.
    masks: Vec<(usize, Canvas)>,
    sampling_mask: Option<SamplingField>,
    history: PaintHistory,
    /// Stages run across every `generate` call; feeds seed derivation.
    stages_run: u64,
    cancelled: Arc<AtomicBool>,
}

impl Painter {
    /// Create a painter for a grayscale `target`.
    pub fn new(config: PainterConfig, target: Canvas, brush: Brush) -> Result<Self, ConfigError> {
        config.validate()?;
        if target.data.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }

        let gradient = GradientField::from_image(&target);
        let target_grid = target.to_grid();
        let blank = Canvas::new(target.width, target.height);

        Ok(Self {
            config,
            target,
            target_grid,
            brush,
            gradient,
            buffer: vec![blank],
            masks: Vec::new(),
            sampling_mask: None,
            history: PaintHistory::default(),
            stages_run: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// `(min_scale, max_scale)` for `stage` of `total_stages`.
    pub fn calc_brush_range(&self, stage: usize, total_stages: usize) -> (f32, f32) {
        self.config.brush_bounds(stage, total_stages)
    }

    /// Placement strategy for `stage` of `total_stages` when no external
    /// mask is set: uniform early on, then the target's blurred gradient with
    /// a blur that shrinks stage by stage.
    pub fn create_sampling_mask(
        &self,
        stage: usize,
        total_stages: usize,
    ) -> Result<(SamplingStrategy, MaskKind), SamplingError> {
        match self.config.sampling.blur_fraction(stage, total_stages) {
            None => Ok((SamplingStrategy::Uniform, MaskKind::Uniform)),
            Some(blur_fraction) => {
                let field = SamplingField::from_gradient(&self.target_grid, blur_fraction)?;
                Ok((
                    SamplingStrategy::Weighted(field),
                    MaskKind::Gradient { blur_fraction },
                ))
            }
        }
    }

    /// Use `field` for every subsequent stage instead of the scheduled mask.
    pub fn set_sampling_mask(&mut self, field: SamplingField) -> Result<(), ConfigError> {
        let found = (field.height(), field.width());
        if found != self.target.dims() {
            return Err(ConfigError::DimensionMismatch {
                expected: self.target.dims(),
                found,
            });
        }
        self.sampling_mask = Some(field);
        Ok(())
    }

    /// Go back to the scheduled masks.
    pub fn clear_sampling_mask(&mut self) {
        self.sampling_mask = None;
    }

    /// Replace the brush-scale ranges for subsequent `generate` calls.
    pub fn set_brush_ranges(&mut self, ranges: [BrushRange; 2]) -> Result<(), ConfigError> {
        validate_brush_ranges(&ranges)?;
        self.config.brush_ranges = ranges;
        Ok(())
    }

    /// Run `params.stages` stages and return the final canvas.
    pub fn generate(&mut self, params: &StageParams) -> Result<&Canvas, PaintError> {
        self.generate_with_callback(params, |_| {})?;
        Ok(self.latest())
    }

    /// Run with a callback invoked after every generation.
    ///
    /// The cancel handle is cleared on entry and checked before each
    /// generation; a cancelled stage still appends its current image and
    /// statistics.
    pub fn generate_with_callback<F>(
        &mut self,
        params: &StageParams,
        mut callback: F,
    ) -> Result<StopReason, PaintError>
    where
        F: FnMut(&PaintProgress),
    {
        params.validate()?;
        self.cancelled.store(false, Ordering::Relaxed);

        for stage in 0..params.stages {
            let bounds = self.calc_brush_range(stage, params.stages);
            let (strategy, mask) = match &self.sampling_mask {
                Some(field) => (SamplingStrategy::Weighted(field.clone()), MaskKind::External),
                None => self.create_sampling_mask(stage, params.stages)?,
            };
            let stage_seed = derive_seed(self.config.seed, &[self.stages_run]);
            self.stages_run += 1;

            info!(
                "Stage {}/{}: brush scale [{:.3}, {:.3}], mask {:?}",
                stage + 1,
                params.stages,
                bounds.0,
                bounds.1,
                mask
            );

            let mut optimizer = StrokeOptimizer::new(
                &self.target,
                &self.gradient,
                &strategy,
                &self.brush,
                self.latest().clone(),
                bounds,
                self.config.padding_margin,
            )?;
            optimizer.init_random(params.strokes, stage_seed);
            let initial_error = optimizer.cached_error();

            let mut generations = 0;
            let mut stop = StopReason::Completed;
            for generation in 0..params.generations {
                if self.cancelled.load(Ordering::Relaxed) {
                    stop = StopReason::Cancelled;
                    break;
                }

                let accepted = optimizer.evolve_all(generation_seed(stage_seed, generation));
                generations += 1;
                debug!(
                    "Stage {} generation {}/{}: error {} ({} accepted)",
                    stage + 1,
                    generation + 1,
                    params.generations,
                    optimizer.cached_error(),
                    accepted
                );

                callback(&PaintProgress {
                    stage,
                    total_stages: params.stages,
                    generation: generation + 1,
                    total_generations: params.generations,
                    error: optimizer.cached_error(),
                    brush_bounds: bounds,
                    accepted: optimizer.accepted(),
                });
            }

            let stats = StageStats {
                buffer_index: self.buffer.len(),
                brush_bounds: bounds,
                mask,
                strokes: params.strokes,
                generations,
                initial_error,
                final_error: optimizer.cached_error(),
                accepted: optimizer.accepted(),
            };
            info!(
                "Stage {} done: error {} -> {} ({:.2} per pixel), {} accepted",
                stage + 1,
                stats.initial_error,
                stats.final_error,
                mean_error(optimizer.cached_image(), &self.target),
                stats.accepted
            );

            if let SamplingStrategy::Weighted(field) = &strategy {
                self.masks.push((stats.buffer_index, field.to_canvas()));
            }
            self.buffer.push(optimizer.into_image());
            self.history.stages.push(stats);

            if stop == StopReason::Cancelled {
                info!("Painting cancelled after stage {}", stage + 1);
                return Ok(stop);
            }
        }

        Ok(StopReason::Completed)
    }

    /// Most recent canvas (blank before the first stage).
    pub fn latest(&self) -> &Canvas {
        &self.buffer[self.buffer.len() - 1]
    }

    /// Every stage's canvas, starting with the blank one.
    pub fn buffer(&self) -> &[Canvas] {
        &self.buffer
    }

    /// Sampling fields of weighted stages as `(buffer_index, image)`.
    /// Uniform stages have no entry.
    pub fn masks(&self) -> &[(usize, Canvas)] {
        &self.masks
    }

    pub fn history(&self) -> &PaintHistory {
        &self.history
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    pub fn target(&self) -> &Canvas {
        &self.target
    }

    pub fn gradient(&self) -> &GradientField {
        &self.gradient
    }

    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

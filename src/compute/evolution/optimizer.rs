//! Per-stage stroke optimizer: `N` independent (1+1) hill climbers that share
//! one composited canvas.

use image::GrayImage;

use crate::compute::{
    Brush, Canvas, Compositor, GradientField, SamplingStrategy, absolute_error,
};
use crate::schema::{ConfigError, DnaSequence, Gene};

use super::rng::{StageContext, StrokeRng, derive_seed};

/// Owns one stage's stroke sequence and the `(cached_error, cached_image)` pair
/// describing its full rendering against the target.
pub struct StrokeOptimizer<'a> {
    target: &'a Canvas,
    gradient: &'a GradientField,
    sampling: &'a SamplingStrategy,
    compositor: Compositor<'a>,
    bounds: (f32, f32),
    base: Canvas,
    dna: DnaSequence,
    stamps: Vec<GrayImage>,
    cached_error: u64,
    cached_image: Canvas,
    accepted: usize,
}

impl<'a> StrokeOptimizer<'a> {
    /// Create an optimizer painting on top of `base`.
    ///
    /// `base`, the gradient field and a weighted sampling field must all
    /// match the target's dimensions.
    pub fn new(
        target: &'a Canvas,
        gradient: &'a GradientField,
        sampling: &'a SamplingStrategy,
        brush: &'a Brush,
        base: Canvas,
        bounds: (f32, f32),
        padding_margin: usize,
    ) -> Result<Self, ConfigError> {
        let expected = target.dims();
        let found = [
            Some(base.dims()),
            Some((gradient.height(), gradient.width())),
            sampling.dims(),
        ];
        if let Some(found) = found.into_iter().flatten().find(|&d| d != expected) {
            return Err(ConfigError::DimensionMismatch { expected, found });
        }

        let (min, max) = bounds;
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(ConfigError::InvalidBrushRange(format!(
                "stage bounds must satisfy 0 < min <= max, got ({}, {})",
                min, max
            )));
        }

        let cached_error = absolute_error(&base, target);
        Ok(Self {
            target,
            gradient,
            sampling,
            compositor: Compositor::new(brush, max, padding_margin),
            bounds,
            cached_image: base.clone(),
            base,
            dna: Vec::new(),
            stamps: Vec::new(),
            cached_error,
            accepted: 0,
        })
    }

    fn context(&self) -> StageContext<'a> {
        StageContext {
            bounds: self.bounds,
            sampling: self.sampling,
            gradient: self.gradient,
        }
    }

    /// Replace the sequence with `count` random genes and refresh the cache.
    pub fn init_random(&mut self, count: usize, seed: u64) {
        let ctx = self.context();
        let mut rng = StrokeRng::new(seed);

        self.dna = (0..count).map(|_| rng.random_gene(&ctx)).collect();
        self.stamps = self.dna.iter().map(|g| self.compositor.stamp(g)).collect();
        self.accepted = 0;

        let image = self
            .compositor
            .render_stamped(self.dna.iter().zip(&self.stamps), &self.base);
        self.cached_error = absolute_error(&image, self.target);
        self.cached_image = image;
    }

    /// Try one mutation of gene `index`. The candidate replaces the live
    /// gene only if its full-canvas error is strictly lower; otherwise every
    /// piece of state is left untouched. Returns whether it was accepted;
    /// an `index` past the end of the sequence is never accepted.
    pub fn evolve_one(&mut self, index: usize, seed: u64) -> bool {
        let Some(&parent) = self.dna.get(index) else {
            return false;
        };
        let ctx = self.context();
        let child = StrokeRng::derived(seed, &[index as u64]).mutate(&parent, &ctx);

        let fresh = (child.scale != parent.scale || child.rotation != parent.rotation)
            .then(|| self.compositor.stamp(&child));
        let child_stamp = fresh.as_ref().unwrap_or(&self.stamps[index]);

        let strokes = self
            .dna
            .iter()
            .zip(&self.stamps)
            .enumerate()
            .map(|(i, stroke)| if i == index { (&child, child_stamp) } else { stroke });
        let image = self.compositor.render_stamped(strokes, &self.base);
        let error = absolute_error(&image, self.target);

        if error >= self.cached_error {
            return false;
        }

        self.dna[index] = child;
        if let Some(stamp) = fresh {
            self.stamps[index] = stamp;
        }
        self.cached_error = error;
        self.cached_image = image;
        self.accepted += 1;
        true
    }

    /// One generation: a mutation attempt for every gene, in index order.
    /// Returns the number of accepted mutations.
    pub fn evolve_all(&mut self, seed: u64) -> usize {
        (0..self.dna.len())
            .filter(|&i| self.evolve_one(i, seed))
            .count()
    }

    pub fn cached_error(&self) -> u64 {
        self.cached_error
    }

    pub fn cached_image(&self) -> &Canvas {
        &self.cached_image
    }

    pub fn genes(&self) -> &[Gene] {
        &self.dna
    }

    pub fn bounds(&self) -> (f32, f32) {
        self.bounds
    }

    /// Mutations accepted since the last [`StrokeOptimizer::init_random`].
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Hand the final rendering back to the caller.
    pub fn into_image(self) -> Canvas {
        self.cached_image
    }
}

/// Seed for generation `generation` of a stage seeded with `stage_seed`.
pub fn generation_seed(stage_seed: u64, generation: usize) -> u64 {
    derive_seed(stage_seed, &[generation as u64])
}

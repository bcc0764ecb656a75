//! Seeded randomness for stroke initialization and mutation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::compute::{GradientField, SamplingStrategy};
use crate::schema::{Gene, GeneField};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

#[inline]
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive a child seed from `base` and a path of static indices
/// (stage, generation, gene index, ...). Order-sensitive.
pub fn derive_seed(base: u64, path: &[u64]) -> u64 {
    path.iter()
        .fold(splitmix64(base), |acc, &p| splitmix64(acc ^ splitmix64(p)))
}

/// Per-stage inputs every stroke draw depends on.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    /// `(min_scale, max_scale)`.
    pub bounds: (f32, f32),
    pub sampling: &'a SamplingStrategy,
    pub gradient: &'a GradientField,
}

impl StageContext<'_> {
    /// Canvas `(height, width)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.gradient.height(), self.gradient.width())
    }
}

/// Random number generator for gene operations.
pub struct StrokeRng {
    rng: StdRng,
}

impl StrokeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create from a seed derived from `base` and `path`.
    pub fn derived(base: u64, path: &[u64]) -> Self {
        Self::new(derive_seed(base, path))
    }

    pub fn intensity(&mut self) -> u8 {
        self.rng.r#gen()
    }

    /// Uniform in `[min, max]`.
    pub fn scale(&mut self, (min, max): (f32, f32)) -> f32 {
        if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        }
    }

    /// `(row, col)` drawn from the stage's sampling strategy.
    pub fn position(&mut self, ctx: &StageContext<'_>) -> (usize, usize) {
        let (height, width) = ctx.dims();
        ctx.sampling.draw(&mut self.rng, height, width)
    }

    /// Rotation at `(pos_y, pos_x)`: random jitter weighted by how weak the
    /// local edge is, plus the edge-perpendicular gradient angle.
    pub fn rotation(&mut self, ctx: &StageContext<'_>, pos_y: usize, pos_x: usize) -> f32 {
        let (mag, angle) = ctx.gradient.at(pos_y, pos_x);
        let jitter: f32 = self.rng.gen_range(-180.0..180.0);
        jitter * (1.0 - mag) + angle + 90.0
    }

    /// Pick between 1 and 5 distinct fields, returned in [`GeneField::ALL`] order.
    pub fn mutation_fields(&mut self) -> Vec<GeneField> {
        let count = self.rng.gen_range(1..=GeneField::ALL.len());
        let chosen: Vec<GeneField> = GeneField::ALL
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect();
        GeneField::ALL
            .iter()
            .copied()
            .filter(|f| chosen.contains(f))
            .collect()
    }

    /// Fresh random gene.
    pub fn random_gene(&mut self, ctx: &StageContext<'_>) -> Gene {
        let intensity = self.intensity();
        let scale = self.scale(ctx.bounds);
        let (pos_y, pos_x) = self.position(ctx);
        let rotation = self.rotation(ctx, pos_y, pos_x);
        Gene {
            intensity,
            pos_y,
            pos_x,
            scale,
            rotation,
        }
    }

    /// Mutated copy of `parent`.
    ///
    /// Selected fields are redrawn with the initialization rules. A new
    /// position is drawn once even if both components were selected, and
    /// rotation reads the gradient at the child's (possibly new) position.
    pub fn mutate(&mut self, parent: &Gene, ctx: &StageContext<'_>) -> Gene {
        let fields = self.mutation_fields();
        let mut child = *parent;
        let mut moved = false;

        for field in fields {
            match field {
                GeneField::Intensity => child.intensity = self.intensity(),
                GeneField::PosY | GeneField::PosX => {
                    if !moved {
                        (child.pos_y, child.pos_x) = self.position(ctx);
                        moved = true;
                    }
                }
                GeneField::Scale => child.scale = self.scale(ctx.bounds),
                GeneField::Rotation => {
                    child.rotation = self.rotation(ctx, child.pos_y, child.pos_x);
                }
            }
        }
        child
    }
}

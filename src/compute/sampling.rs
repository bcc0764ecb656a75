//! Spatial sampling fields that bias where strokes are placed.
//!
//! A [`SamplingField`] is an unnormalized, non-negative weight per pixel.
//! Drawing a position picks a flat index with probability proportional to its
//! weight and converts it back to `(row, col)`.

use rand::Rng;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};

use super::{Canvas, Grid, gaussian_blur, gradient_magnitude, sobel_gradient};

/// Display range the gradient-derived field is rescaled to.
const FIELD_DISPLAY_MAX: f32 = 255.0;

/// Errors raised while building a sampling field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    #[error("No valid sampling positions: field weights sum to zero")]
    NoValidPositions,
    #[error("Sampling field contains a non-finite weight")]
    InvalidWeight,
}

impl From<WeightedError> for SamplingError {
    fn from(err: WeightedError) -> Self {
        match err {
            WeightedError::NoItem | WeightedError::AllWeightsZero => Self::NoValidPositions,
            _ => Self::InvalidWeight,
        }
    }
}

/// Probability-weighted spatial map over pixel coordinates.
#[derive(Debug, Clone)]
pub struct SamplingField {
    field: Grid,
    index: WeightedIndex<f64>,
}

impl SamplingField {
    /// Build from raw weights. Negative weights are clipped to zero.
    ///
    /// Fails with [`SamplingError::NoValidPositions`] if nothing remains to sample.
    pub fn new(field: Grid) -> Result<Self, SamplingError> {
        if field.data.iter().any(|v| !v.is_finite()) {
            return Err(SamplingError::InvalidWeight);
        }
        let index = WeightedIndex::new(field.data.iter().map(|&v| v.max(0.0) as f64))?;
        Ok(Self { field, index })
    }

    /// Blurred Sobel magnitude of `source`.
    ///
    /// The blur standard deviation is `source.height * blur_fraction` pixels;
    /// no blur is applied when that is at most one pixel. The result is
    /// rescaled to 0..=255 for inspection, which does not change the
    /// distribution.
    pub fn from_gradient(source: &Grid, blur_fraction: f32) -> Result<Self, SamplingError> {
        let (gx, gy) = sobel_gradient(&source.data, source.width, source.height);
        let mut field = Grid {
            width: source.width,
            height: source.height,
            data: gradient_magnitude(&gx, &gy),
        };

        let sigma = source.height as f32 * blur_fraction;
        if sigma > 1.0 {
            field = gaussian_blur(&field, sigma);
        }

        let max = field.max();
        if max <= 0.0 {
            return Err(SamplingError::NoValidPositions);
        }
        let scale = FIELD_DISPLAY_MAX / max;
        for v in &mut field.data {
            *v *= scale;
        }

        Self::new(field)
    }

    /// Draw one `(row, col)` position.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        let flat = self.index.sample(rng);
        (flat / self.field.width, flat % self.field.width)
    }

    /// Underlying weights.
    pub fn field(&self) -> &Grid {
        &self.field
    }

    pub fn width(&self) -> usize {
        self.field.width
    }

    pub fn height(&self) -> usize {
        self.field.height
    }

    /// Weights quantized to 0..=255 for saving as an image.
    pub fn to_canvas(&self) -> Canvas {
        self.field.to_canvas_normalized()
    }
}

/// Where stroke positions are drawn from.
#[derive(Debug, Clone)]
pub enum SamplingStrategy {
    /// Every pixel equally likely.
    Uniform,
    /// Proportional to a sampling field.
    Weighted(SamplingField),
}

impl SamplingStrategy {
    /// Draw `(row, col)` inside a `height` x `width` canvas.
    ///
    /// Weighted fields are assumed to match the canvas dimensions.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, height: usize, width: usize) -> (usize, usize) {
        match self {
            Self::Uniform => (rng.gen_range(0..height), rng.gen_range(0..width)),
            Self::Weighted(field) => field.sample(rng),
        }
    }

    /// Dimensions `(height, width)` this strategy is tied to, if any.
    pub fn dims(&self) -> Option<(usize, usize)> {
        match self {
            Self::Uniform => None,
            Self::Weighted(field) => Some((field.height(), field.width())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_field_fails_explicitly() {
        let err = SamplingField::new(Grid::new(4, 4)).unwrap_err();
        assert_eq!(err, SamplingError::NoValidPositions);

        let negative = Grid::filled(3, 3, -2.0);
        assert_eq!(
            SamplingField::new(negative).unwrap_err(),
            SamplingError::NoValidPositions
        );
    }

    #[test]
    fn test_nan_field_rejected() {
        let mut grid = Grid::filled(2, 2, 1.0);
        grid.data[3] = f32::NAN;
        assert_eq!(
            SamplingField::new(grid).unwrap_err(),
            SamplingError::InvalidWeight
        );
    }

    #[test]
    fn test_single_cell_concentration() {
        let mut grid = Grid::new(20, 15);
        grid.set(13, 4, 7.5);
        let field = SamplingField::new(grid).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let draws = 10_000;
        let hits = (0..draws)
            .filter(|_| field.sample(&mut rng) == (4, 13))
            .count();
        assert!(hits as f64 > 0.99 * draws as f64, "only {} hits", hits);
    }

    #[test]
    fn test_negative_cells_never_drawn() {
        let mut grid = Grid::filled(6, 6, -1.0);
        grid.set(0, 5, 1.0);
        grid.set(5, 0, 1.0);
        let field = SamplingField::new(grid).unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2_000 {
            let pos = field.sample(&mut rng);
            assert!(pos == (5, 0) || pos == (0, 5), "drew clipped cell {:?}", pos);
        }
    }

    #[test]
    fn test_uniform_has_no_quadrant_bias() {
        let (height, width) = (40, 60);
        let strategy = SamplingStrategy::Uniform;
        let mut rng = StdRng::seed_from_u64(99);

        let draws = 40_000;
        let mut quadrants = [0usize; 4];
        for _ in 0..draws {
            let (y, x) = strategy.draw(&mut rng, height, width);
            assert!(y < height && x < width);
            let q = (y >= height / 2) as usize * 2 + (x >= width / 2) as usize;
            quadrants[q] += 1;
        }

        // Chi-square with 3 dof; 16.27 is the 0.1% critical value.
        let expected = draws as f64 / 4.0;
        let chi2: f64 = quadrants
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi2 < 16.27, "quadrant counts {:?} chi2 {}", quadrants, chi2);
    }

    #[test]
    fn test_weighted_field_matches_proportions() {
        // Right column has 3x the weight of the left column.
        let grid = Grid::from_vec(2, 1, vec![1.0, 3.0]).unwrap();
        let strategy = SamplingStrategy::Weighted(SamplingField::new(grid).unwrap());
        let mut rng = StdRng::seed_from_u64(5);

        let draws = 20_000;
        let right = (0..draws)
            .filter(|_| strategy.draw(&mut rng, 1, 2) == (0, 1))
            .count();
        let share = right as f64 / draws as f64;
        assert!((share - 0.75).abs() < 0.02, "share {}", share);
    }

    #[test]
    fn test_gradient_field_focuses_on_edges() {
        let width = 32;
        let height = 32;
        let data = (0..width * height)
            .map(|i| if i % width < 16 { 0.0 } else { 255.0 })
            .collect();
        let source = Grid::from_vec(width, height, data).unwrap();

        // Small blur fraction: sigma below one pixel, no blur.
        let field = SamplingField::from_gradient(&source, 0.01).unwrap();
        assert!((field.field().max() - 255.0).abs() < 1e-3);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let (_, x) = field.sample(&mut rng);
            assert!(x == 15 || x == 16, "sampled off-edge column {}", x);
        }
    }

    #[test]
    fn test_gradient_field_blur_widens_support() {
        let width = 32;
        let height = 32;
        let data = (0..width * height)
            .map(|i| if i % width < 16 { 0.0 } else { 255.0 })
            .collect();
        let source = Grid::from_vec(width, height, data).unwrap();

        let sharp = SamplingField::from_gradient(&source, 0.01).unwrap();
        let blurred = SamplingField::from_gradient(&source, 0.1).unwrap();

        let support = |f: &SamplingField| f.field().data.iter().filter(|&&v| v > 0.0).count();
        assert!(support(&blurred) > support(&sharp));
    }

    #[test]
    fn test_debug_canvas_spans_display_range() {
        let grid = Grid::from_vec(3, 1, vec![0.0, 2.0, 8.0]).unwrap();
        let canvas = SamplingField::new(grid).unwrap().to_canvas();
        assert_eq!(canvas.data, vec![0, 63, 255]);
    }

    #[test]
    fn test_flat_source_has_no_positions() {
        let source = Grid::filled(8, 8, 128.0);
        assert_eq!(
            SamplingField::from_gradient(&source, 0.25).unwrap_err(),
            SamplingError::NoValidPositions
        );
    }
}

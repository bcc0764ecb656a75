//! Gradient computation using Sobel filters.
//!
//! Computes spatial gradients of the target image. The resulting
//! [`GradientField`] steers stroke orientation, and the raw magnitude feeds
//! the gradient-derived sampling field.

use super::{Canvas, Grid};

/// Sobel filter kernels for gradient computation.
/// These are the standard 3x3 Sobel operators.
const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Exponent applied to the normalized magnitude to flatten strong/weak edges.
pub const MAGNITUDE_GAMMA: f32 = 0.3;

/// Compute gradient of a 2D grid using Sobel filters.
/// Returns (gradient_x, gradient_y) as flat vectors.
///
/// Border pixels replicate their nearest neighbour, so a constant image has
/// zero gradient everywhere including the edges.
pub fn sobel_gradient(grid: &[f32], width: usize, height: usize) -> (Vec<f32>, Vec<f32>) {
    let mut grad_x = vec![0.0f32; width * height];
    let mut grad_y = vec![0.0f32; width * height];

    for y in 0..height {
        for x in 0..width {
            let mut gx = 0.0f32;
            let mut gy = 0.0f32;

            for ky in 0..3 {
                for kx in 0..3 {
                    let sx = (x + kx).saturating_sub(1).min(width - 1);
                    let sy = (y + ky).saturating_sub(1).min(height - 1);
                    let val = grid[sy * width + sx];

                    gx += SOBEL_X[ky][kx] * val;
                    gy += SOBEL_Y[ky][kx] * val;
                }
            }

            grad_x[y * width + x] = gx * 0.125;
            grad_y[y * width + x] = gy * 0.125;
        }
    }

    (grad_x, grad_y)
}

/// Compute gradient magnitude from gradient components.
pub fn gradient_magnitude(grad_x: &[f32], grad_y: &[f32]) -> Vec<f32> {
    grad_x
        .iter()
        .zip(grad_y.iter())
        .map(|(&gx, &gy)| (gx * gx + gy * gy).sqrt())
        .collect()
}

/// Convert gradient components to (magnitude, angle in degrees within [0, 360)).
pub fn to_polar(grad_x: &[f32], grad_y: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let magnitude = gradient_magnitude(grad_x, grad_y);
    let angle = grad_x
        .iter()
        .zip(grad_y.iter())
        .map(|(&gx, &gy)| gy.atan2(gx).to_degrees().rem_euclid(360.0))
        .collect();
    (magnitude, angle)
}

/// Edge strength and orientation of the target, computed once per painter.
#[derive(Debug, Clone)]
pub struct GradientField {
    /// Normalized, gamma-compressed magnitude in [0, 1].
    pub magnitude: Grid,
    /// Gradient direction in degrees.
    pub angle: Grid,
}

impl GradientField {
    /// Build from a grayscale target.
    ///
    /// A flat image (no gradient anywhere) yields an all-zero magnitude.
    pub fn from_image(image: &Canvas) -> Self {
        let (width, height) = (image.width, image.height);
        let normalized: Vec<f32> = image.data.iter().map(|&v| v as f32 / 255.0).collect();

        let (gx, gy) = sobel_gradient(&normalized, width, height);
        let (mut magnitude, angle) = to_polar(&gx, &gy);

        let max = magnitude.iter().copied().fold(0.0f32, f32::max);
        if max > 0.0 {
            for m in &mut magnitude {
                *m = (*m / max).powf(MAGNITUDE_GAMMA);
            }
        }

        Self {
            magnitude: Grid {
                width,
                height,
                data: magnitude,
            },
            angle: Grid {
                width,
                height,
                data: angle,
            },
        }
    }

    /// `(magnitude, angle)` at row `y`, column `x`.
    #[inline]
    pub fn at(&self, y: usize, x: usize) -> (f32, f32) {
        let idx = self.magnitude.idx(x, y);
        (self.magnitude.data[idx], self.angle.data[idx])
    }

    pub fn width(&self) -> usize {
        self.magnitude.width
    }

    pub fn height(&self) -> usize {
        self.magnitude.height
    }
}

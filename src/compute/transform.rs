//! Image operations behind brush stamps and sampling fields.
//!
//! Stamps are 8-bit alpha images scaled with a Catmull-Rom cubic filter and
//! rotated bilinearly about their centre. Sampling fields are float rasters
//! smoothed with a Gaussian blur.

use image::{
    GrayImage, ImageBuffer, Luma,
    imageops::{self, FilterType},
};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

use super::Grid;

/// Float raster in the layout `imageops` filters operate on.
type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Resize proportionally by `factor` with a cubic (Catmull-Rom) filter.
///
/// Output dimensions are `round(dim * factor)`, never smaller than 1.
pub fn resize(src: &GrayImage, factor: f32) -> GrayImage {
    let (w, h) = src.dimensions();
    let width = ((w as f32 * factor).round() as u32).max(1);
    let height = ((h as f32 * factor).round() as u32).max(1);
    if w == 0 || h == 0 || (width == w && height == h) {
        return src.clone();
    }
    imageops::resize(src, width, height, FilterType::CatmullRom)
}

/// Rotate by `degrees` about the image centre, keeping the input shape.
///
/// Positive angles turn counter-clockwise as displayed. Pixels whose source
/// falls outside the input are transparent (0).
pub fn rotate(src: &GrayImage, degrees: f32) -> GrayImage {
    if src.width() == 0 || src.height() == 0 || degrees.rem_euclid(360.0) == 0.0 {
        return src.clone();
    }
    // imageproc turns clockwise for positive theta
    rotate_about_center(src, -degrees.to_radians(), Interpolation::Bilinear, Luma([0]))
}

/// Gaussian blur with standard deviation `sigma`. Non-positive sigma is a no-op.
///
/// Negative samples are treated as zero.
pub fn gaussian_blur(src: &Grid, sigma: f32) -> Grid {
    let peak = src.max();
    if sigma <= 0.0 || src.is_empty() || peak <= 0.0 {
        return src.clone();
    }

    // imageops clamps float samples to [0, 1]
    let unit: Vec<f32> = src.data.iter().map(|v| v.max(0.0) / peak).collect();
    let Some(image) = FloatImage::from_raw(src.width as u32, src.height as u32, unit) else {
        return src.clone();
    };

    let data = imageops::blur(&image, sigma)
        .into_raw()
        .into_iter()
        .map(|v| v * peak)
        .collect();
    Grid::from_vec(src.width, src.height, data).unwrap_or_else(|| src.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_dimensions() {
        let src = GrayImage::new(300, 120);
        assert_eq!(resize(&src, 0.5).dimensions(), (150, 60));
        assert_eq!(resize(&src, 0.001).dimensions(), (1, 1));
    }

    #[test]
    fn test_resize_preserves_constant() {
        let src = GrayImage::from_pixel(10, 10, Luma([180]));
        let out = resize(&src, 1.7);
        assert_eq!(out.dimensions(), (17, 17));
        for p in out.pixels() {
            assert!(p.0[0].abs_diff(180) <= 1, "got {}", p.0[0]);
        }
    }

    #[test]
    fn test_resize_identity_factor() {
        let src = GrayImage::from_fn(7, 5, |x, y| Luma([(x * 30 + y) as u8]));
        assert_eq!(resize(&src, 1.0), src);
    }

    #[test]
    fn test_rotate_full_turn_is_identity() {
        let src = GrayImage::from_fn(6, 4, |x, y| Luma([(x * 40 + y * 3) as u8]));
        assert_eq!(rotate(&src, 0.0), src);
        assert_eq!(rotate(&src, 360.0), src);
        assert_eq!(rotate(&src, -720.0), src);
    }

    #[test]
    fn test_rotate_keeps_shape_and_clears_corners() {
        let src = GrayImage::from_pixel(21, 21, Luma([255]));
        let out = rotate(&src, 45.0);

        assert_eq!(out.dimensions(), (21, 21));
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(20, 20).0[0], 0);
        assert!(out.get_pixel(10, 10).0[0] > 250);
    }

    #[test]
    fn test_quarter_turn_is_counter_clockwise() {
        // Bright band along the right edge ends up along the top.
        let src = GrayImage::from_fn(16, 16, |x, _| Luma([if x >= 12 { 255 } else { 0 }]));
        let out = rotate(&src, 90.0);

        let mass = |rows: std::ops::Range<u32>| -> u64 {
            rows.flat_map(|y| (0..16).map(move |x| (x, y)))
                .map(|(x, y)| out.get_pixel(x, y).0[0] as u64)
                .sum()
        };
        assert!(mass(0..8) > 10 * mass(8..16).max(1));
    }

    #[test]
    fn test_blur_preserves_constant() {
        let src = Grid::filled(20, 20, 5.0);
        let out = gaussian_blur(&src, 2.0);
        for v in &out.data {
            assert!((v - 5.0).abs() < 1e-3, "got {}", v);
        }
    }

    #[test]
    fn test_blur_spreads_impulse_symmetrically() {
        let mut src = Grid::new(21, 21);
        src.set(10, 10, 1.0);
        let out = gaussian_blur(&src, 2.0);

        assert!(out.get(10, 10) < 1.0);
        assert!(out.get(12, 10) > 0.0);
        assert!((out.get(8, 10) - out.get(12, 10)).abs() < 1e-5);
        assert!((out.get(10, 8) - out.get(10, 12)).abs() < 1e-5);

        let total: f32 = out.data.iter().sum();
        assert!((total - 1.0).abs() < 0.05, "mass {}", total);
    }

    #[test]
    fn test_blur_keeps_magnitude_scale() {
        let mut src = Grid::new(15, 15);
        src.set(7, 7, 200.0);
        let out = gaussian_blur(&src, 1.5);

        let peak = out.max();
        assert!(peak > 1.0 && peak < 200.0);
    }

    #[test]
    fn test_blur_non_positive_sigma_is_noop() {
        let src = Grid::from_vec(3, 1, vec![0.0, 4.0, 1.0]).unwrap();
        assert_eq!(gaussian_blur(&src, 0.0), src);
        assert_eq!(gaussian_blur(&src, -1.0), src);
    }
}

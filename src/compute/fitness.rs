//! Image-space fitness: how far a rendered canvas is from the target.

use rayon::prelude::*;

use super::Canvas;

/// Total absolute per-pixel difference between `rendered` and `target`.
///
/// Lower is better; zero means identical. Computed as the sum of the two
/// one-sided saturating differences, which equals `|r - t|` per pixel.
/// Row sums are reduced in parallel; integer addition keeps the result
/// independent of thread scheduling.
pub fn absolute_error(rendered: &Canvas, target: &Canvas) -> u64 {
    debug_assert_eq!(rendered.dims(), target.dims(), "canvas size mismatch");
    let width = rendered.width.max(1);

    rendered
        .data
        .par_chunks(width)
        .zip(target.data.par_chunks(width))
        .map(|(r_row, t_row)| {
            r_row
                .iter()
                .zip(t_row)
                .map(|(&r, &t)| (t.saturating_sub(r) + r.saturating_sub(t)) as u64)
                .sum::<u64>()
        })
        .sum()
}

/// [`absolute_error`] divided by the pixel count, for logging.
pub fn mean_error(rendered: &Canvas, target: &Canvas) -> f64 {
    let n = rendered.data.len();
    if n == 0 {
        return 0.0;
    }
    absolute_error(rendered, target) as f64 / n as f64
}

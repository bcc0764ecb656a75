//! Brushstroke compositing.
//!
//! Every gene stamps the shared brush template (scaled, then rotated) onto
//! the canvas as a soft stencil: `out = alpha * paint + (1 - alpha) * background`.
//! Rendering happens on a padded copy so stamps near the edges never need
//! clipping; the pad is removed before the result is handed back.

use image::GrayImage;
use log::trace;

use crate::schema::{ConfigError, Gene};

use super::{Canvas, resize, rotate};

/// Grayscale brush stencil: 255 paints fully, 0 is transparent. Never
/// mutated once built.
#[derive(Debug, Clone)]
pub struct Brush {
    template: GrayImage,
}

impl Brush {
    pub fn new(template: GrayImage) -> Result<Self, ConfigError> {
        if template.width() == 0 || template.height() == 0 {
            return Err(ConfigError::EmptyBrush);
        }
        Ok(Self { template })
    }

    /// Resize `template` so its longest side is `size` pixels.
    pub fn with_size(template: GrayImage, size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidBrushSize);
        }
        let longest = template.width().max(template.height());
        if longest == 0 {
            return Err(ConfigError::EmptyBrush);
        }
        Self::new(resize(&template, size as f32 / longest as f32))
    }

    pub fn template(&self) -> &GrayImage {
        &self.template
    }

    /// Longest side in pixels at scale 1.0.
    pub fn extent(&self) -> usize {
        self.template.width().max(self.template.height()) as usize
    }
}

/// Renders genes with one brush at one stage's maximum scale.
#[derive(Debug, Clone, Copy)]
pub struct Compositor<'a> {
    brush: &'a Brush,
    padding: usize,
}

impl<'a> Compositor<'a> {
    /// Padding is half the largest stamp `max_scale` can produce, plus `margin`.
    ///
    /// Stamp sides are rounded, so the extent is rounded up here: every stamp
    /// at or below `max_scale` fits even with `margin == 0`.
    pub fn new(brush: &'a Brush, max_scale: f32, margin: usize) -> Self {
        let padding = (brush.extent() as f32 * max_scale).ceil() as usize / 2 + margin;
        Self { brush, padding }
    }

    /// Border added around the canvas while rendering.
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Brush template transformed for `gene`: scaled, then rotated in place.
    pub fn stamp(&self, gene: &Gene) -> GrayImage {
        let scaled = resize(self.brush.template(), gene.scale);
        rotate(&scaled, gene.rotation)
    }

    /// Render one gene onto `canvas`, which must already carry this
    /// compositor's padding. Returns `false` if the stamp did not fit and
    /// nothing was drawn.
    pub fn render_gene(&self, gene: &Gene, canvas: &mut Canvas) -> bool {
        let stamp = self.stamp(gene);
        self.blend_stamp(gene, &stamp, canvas)
    }

    /// Render a whole sequence on top of `base` (unpadded). `base` is not modified.
    pub fn render_all(&self, dna: &[Gene], base: &Canvas) -> Canvas {
        let mut padded = base.padded(self.padding);
        for gene in dna {
            self.render_gene(gene, &mut padded);
        }
        padded.cropped(self.padding)
    }

    /// Like [`Compositor::render_all`] but with stamps computed ahead of time.
    pub fn render_stamped<'s>(
        &self,
        strokes: impl IntoIterator<Item = (&'s Gene, &'s GrayImage)>,
        base: &Canvas,
    ) -> Canvas {
        let mut padded = base.padded(self.padding);
        for (gene, stamp) in strokes {
            self.blend_stamp(gene, stamp, &mut padded);
        }
        padded.cropped(self.padding)
    }

    /// Alpha-blend a prepared stamp centred on the gene's position.
    ///
    /// The ROI starts `extent / 2` (truncating) above and left of the gene, so
    /// odd stamps are centred on its pixel and even stamps put their extra
    /// row and column above and to the left.
    pub fn blend_stamp(&self, gene: &Gene, stamp: &GrayImage, canvas: &mut Canvas) -> bool {
        let (rows, cols) = (stamp.height() as usize, stamp.width() as usize);
        let cy = gene.pos_y + self.padding;
        let cx = gene.pos_x + self.padding;

        let (Some(y0), Some(x0)) = (cy.checked_sub(rows / 2), cx.checked_sub(cols / 2)) else {
            trace!("Skipping stroke at ({}, {}): stamp crosses top/left pad", gene.pos_y, gene.pos_x);
            return false;
        };
        if y0 + rows > canvas.height || x0 + cols > canvas.width {
            trace!("Skipping stroke at ({}, {}): stamp crosses bottom/right pad", gene.pos_y, gene.pos_x);
            return false;
        }

        let paint = gene.intensity as f32;
        for sy in 0..rows {
            let stencil = &stamp.as_raw()[sy * cols..(sy + 1) * cols];
            let start = (y0 + sy) * canvas.width + x0;
            let roi = &mut canvas.data[start..start + cols];

            for (px, &a) in roi.iter_mut().zip(stencil) {
                if a == 0 {
                    continue;
                }
                let alpha = a as f32 / 255.0;
                let out = alpha * paint + (1.0 - alpha) * *px as f32;
                *px = out.clamp(0.0, 255.0) as u8;
            }
        }
        true
    }
}

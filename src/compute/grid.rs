//! Raster containers shared by every compute stage.
//!
//! Two flavours are used: [`Grid`] holds f32 samples (gradients, sampling
//! weights, brush stencils) and [`Canvas`] holds the 8-bit painted surface
//! and the grayscale target it is compared against.

/// Row-major single-channel f32 raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Width in pixels (columns).
    pub width: usize,
    /// Height in pixels (rows).
    pub height: usize,
    /// Samples, `data[y * width + x]`.
    pub data: Vec<f32>,
}

impl Grid {
    /// Zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Grid with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing buffer. Returns `None` if the length does not match.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Flat index of `(x, y)`.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let idx = self.idx(x, y);
        self.data[idx] = value;
    }

    /// Largest sample, or 0 for an empty grid.
    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(0.0f32, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Quantize to an 8-bit canvas, scaling the maximum to 255.
    pub fn to_canvas_normalized(&self) -> Canvas {
        let max = self.max();
        let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
        Canvas {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .map(|&v| (v.max(0.0) * scale).min(255.0) as u8)
                .collect(),
        }
    }
}

/// Row-major 8-bit grayscale raster: the painted surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels (columns).
    pub width: usize,
    /// Height in pixels (rows).
    pub height: usize,
    /// Intensities, `data[y * width + x]`.
    pub data: Vec<u8>,
}

impl Canvas {
    /// Black canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing buffer. Returns `None` if the length does not match.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// `(height, width)`, the order positions are expressed in.
    pub fn dims(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// True if every pixel is zero.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Intensities as f32 in 0..=255.
    pub fn to_grid(&self) -> Grid {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| v as f32).collect(),
        }
    }

    /// Copy surrounded by a black border of `pad` pixels on every side.
    pub fn padded(&self, pad: usize) -> Canvas {
        let width = self.width + 2 * pad;
        let height = self.height + 2 * pad;
        let mut out = Canvas::new(width, height);
        for y in 0..self.height {
            let src = &self.data[y * self.width..(y + 1) * self.width];
            let start = (y + pad) * width + pad;
            out.data[start..start + self.width].copy_from_slice(src);
        }
        out
    }

    /// Strip a border of `pad` pixels. Inverse of [`Canvas::padded`].
    pub fn cropped(&self, pad: usize) -> Canvas {
        let width = self.width.saturating_sub(2 * pad);
        let height = self.height.saturating_sub(2 * pad);
        let mut data = Vec::with_capacity(width * height);
        for y in pad..pad + height {
            let start = y * self.width + pad;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Canvas {
            width,
            height,
            data,
        }
    }
}

//! Stroke Painter - Gradient-guided evolutionary brushstroke painting.
//!
//! Approximates a grayscale target image by compositing a fixed brush
//! template many times, with each stroke's intensity, position, scale and
//! rotation refined by greedy hill climbing. Painting runs in stages that
//! start with large, uniformly placed strokes and end with small strokes
//! concentrated along the target's edges.
//!
//! # Architecture
//!
//! - `schema`: Configuration, gene and progress types
//! - `compute`: Rasters, image operations, compositing, fitness and the
//!   evolutionary search
//! - `io`: Image loading/saving and history export
//!
//! # Example
//!
//! ```rust,no_run
//! use stroke_painter::{Painter, PainterConfig, StageParams};
//! use stroke_painter::io::{export_buffer, load_brush, load_canvas};
//!
//! let config = PainterConfig::default();
//! let target = load_canvas("target.png").unwrap();
//! let brush = load_brush("brush.png", config.brush_size).unwrap();
//!
//! let mut painter = Painter::new(config, target, brush).unwrap();
//! let result = painter.generate(&StageParams::default()).unwrap();
//! println!("Final canvas: {}x{}", result.width, result.height);
//!
//! export_buffer("frames", painter.buffer()).unwrap();
//! ```

pub mod compute;
pub mod error;
pub mod io;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::Painter;
pub use compute::{Brush, Canvas};
pub use error::PaintError;
pub use schema::{PainterConfig, StageParams};

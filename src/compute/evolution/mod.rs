//! Evolutionary brushstroke search.
//!
//! # Overview
//!
//! - **Seeded randomness** (`rng`): seed derivation from static indices and
//!   the per-field draw rules shared by initialization and mutation
//! - **Stroke optimizer** (`optimizer`): one stage's stroke sequence, refined by
//!   greedy per-gene hill climbing against the composited canvas
//! - **Painter** (`painter`): the stage scheduler that anneals brush scale and
//!   placement bias and keeps a buffer of every stage's canvas
//!
//! # Example
//!
//! ```rust,no_run
//! use stroke_painter::compute::evolution::Painter;
//! use stroke_painter::io::{load_brush, load_canvas};
//! use stroke_painter::schema::{PainterConfig, StageParams};
//!
//! let target = load_canvas("target.png").unwrap();
//! let brush = load_brush("brush.png", 300).unwrap();
//! let mut painter = Painter::new(PainterConfig::default(), target, brush).unwrap();
//!
//! let reason = painter
//!     .generate_with_callback(&StageParams::default(), |progress| {
//!         println!("Stage {} generation {}: error = {}",
//!             progress.stage, progress.generation, progress.error);
//!     })
//!     .unwrap();
//! println!("{:?}, {} stages buffered", reason, painter.buffer().len() - 1);
//! ```

mod optimizer;
mod painter;
mod rng;

pub use optimizer::{StrokeOptimizer, generation_seed};
pub use painter::Painter;
pub use rng::{StageContext, StrokeRng, derive_seed};

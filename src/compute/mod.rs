//! Compute module - Rasters, image operations, compositing and stroke search.

mod compositor;
mod fitness;
mod gradient;
mod grid;
mod sampling;
mod transform;

pub mod evolution;

pub use compositor::*;
pub use fitness::*;
pub use gradient::*;
pub use grid::*;
pub use sampling::*;
pub use transform::*;

//! Schema module - Configuration, gene and progress types for painter runs.

mod config;
mod gene;
mod progress;

pub use config::*;
pub use gene::*;
pub use progress::*;

//! Progress, statistics and history types reported while painting.

use serde::{Deserialize, Serialize};

/// How stroke positions were drawn during a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaskKind {
    /// Uniform over the canvas.
    Uniform,
    /// Blurred target gradient with the given blur fraction.
    Gradient { blur_fraction: f32 },
    /// Caller-supplied mask.
    External,
}

/// Progress update emitted after every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintProgress {
    /// Stage index within the current `generate` call.
    pub stage: usize,
    /// Stages in the current `generate` call.
    pub total_stages: usize,
    /// Generations completed in this stage.
    pub generation: usize,
    /// Generations per stage.
    pub total_generations: usize,
    /// Current cached error of the stage's optimizer.
    pub error: u64,
    /// Brush-scale bounds of the stage.
    pub brush_bounds: (f32, f32),
    /// Mutations accepted so far in this stage.
    pub accepted: usize,
}

/// Summary of one completed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStats {
    /// Index into the painter's canvas buffer (1-based; 0 is the blank canvas).
    pub buffer_index: usize,
    /// Brush-scale bounds used.
    pub brush_bounds: (f32, f32),
    /// Placement strategy used.
    pub mask: MaskKind,
    /// Strokes placed.
    pub strokes: usize,
    /// Generations actually run.
    pub generations: usize,
    /// Error right after random initialization.
    pub initial_error: u64,
    /// Error when the stage finished.
    pub final_error: u64,
    /// Mutations accepted across all generations.
    pub accepted: usize,
}

/// Why a `generate` call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every requested stage ran.
    Completed,
    /// The cancel handle was set.
    Cancelled,
}

/// Per-stage history of a painter, across all `generate` calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaintHistory {
    pub stages: Vec<StageStats>,
}

impl PaintHistory {
    /// Final error of each stage, in order.
    pub fn final_errors(&self) -> Vec<u64> {
        self.stages.iter().map(|s| s.final_error).collect()
    }

    /// Total accepted mutations.
    pub fn total_accepted(&self) -> usize {
        self.stages.iter().map(|s| s.accepted).sum()
    }
}

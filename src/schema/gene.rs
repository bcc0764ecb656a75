//! Brushstroke genes: the unit the optimizer mutates.

use serde::{Deserialize, Serialize};

/// One brushstroke's parameters.
///
/// Genes are plain values; mutation always builds a replacement gene rather
/// than editing fields of a gene that is shared with the live sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    /// Grayscale paint value.
    pub intensity: u8,
    /// Row of the stroke center, in unpadded canvas coordinates.
    pub pos_y: usize,
    /// Column of the stroke center, in unpadded canvas coordinates.
    pub pos_x: usize,
    /// Multiplier on the brush template's linear dimensions.
    pub scale: f32,
    /// Rotation applied to the brush template, in degrees.
    pub rotation: f32,
}

/// Mutable fields of a [`Gene`].
///
/// `PosY` and `PosX` are coupled: selecting either redraws the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneField {
    Intensity,
    PosY,
    PosX,
    Scale,
    Rotation,
}

impl GeneField {
    /// Every field, in application order.
    pub const ALL: [GeneField; 5] = [
        GeneField::Intensity,
        GeneField::PosY,
        GeneField::PosX,
        GeneField::Scale,
        GeneField::Rotation,
    ];
}

/// Ordered stroke list; later genes are composited on top of earlier ones.
pub type DnaSequence = Vec<Gene>;

//! Archetype classification — coordinate plus matrix to one quadrant
//! descriptor in the requested locale.

use crate::config::MatrixDef;
use crate::types::{Coordinate, Locale, QuadrantPosition};

/// The resolved archetype for one matrix at one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archetype<'a> {
    pub position: QuadrantPosition,
    /// Quadrant label in the requested locale.
    pub label: &'a str,
    /// Behavioral description in the requested locale, if the quadrant
    /// carries one. `None` means the matrix contributes no policy line.
    pub description: Option<&'a str>,
}

/// Select the one quadrant descriptor that applies to `coord`.
///
/// Tie-break (preserved exactly, including the asymmetry between axes):
/// the horizontal midpoint belongs to the right half, the vertical midpoint
/// to the bottom half.
pub fn classify<'a>(matrix: &'a MatrixDef, coord: Coordinate, locale: Locale) -> Archetype<'a> {
    let position = QuadrantPosition::classify(coord);
    let quadrant = matrix.quadrants.at(position);
    Archetype {
        position,
        label: quadrant.label(locale),
        description: quadrant.description(locale),
    }
}

//! Coordinate normalization — raw pad values to signed display values.

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// A signed display pair in `[-100, 100]` per axis, center 0.
///
/// Left is negative, right positive. The y sign is inverted: "up" is the
/// larger raw value but renders as the negative display extreme, so down is
/// `+100` and up is `-100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCoordinate {
    pub x: i32,
    pub y: i32,
}

/// Convert a raw coordinate into its signed display pair.
///
/// Out-of-range input is clamped rather than rejected; the interactive
/// surface should never produce it, but the engine does not trust that.
pub fn normalize(coord: Coordinate) -> DisplayCoordinate {
    let c = coord.clamped();
    DisplayCoordinate {
        x: (c.x - 50) * 2,
        y: (c.y - 50) * -2,
    }
}

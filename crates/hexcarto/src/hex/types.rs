//! Grid cell and output record types.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::convert::{axial_to_pixel, hex_distance};

/// Axial offsets `(dq, dr)` of the six neighbours: E, NE, NW, W, SW, SE.
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// A cell of the infinite hex grid. Ordered by `(q, r)` so sets of cells
/// iterate deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxialCell {
    pub q: i32,
    pub r: i32,
}

impl AxialCell {
    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Implied third cube coordinate.
    #[inline]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    #[inline]
    pub fn neighbor(&self, dir: usize) -> Self {
        let (dq, dr) = DIRECTIONS[dir % 6];
        Self::new(self.q + dq, self.r + dr)
    }

    pub fn neighbors(&self) -> [AxialCell; 6] {
        std::array::from_fn(|d| self.neighbor(d))
    }

    #[inline]
    pub fn distance(&self, other: AxialCell) -> i32 {
        hex_distance(self.q, self.r, other.q, other.r)
    }

    #[inline]
    pub fn to_pixel(&self, size: f64) -> Vector2<f64> {
        axial_to_pixel(self.q, self.r, size)
    }

    /// All cells at hex distance `<= radius`, including `self`.
    pub fn within(&self, radius: i32) -> impl Iterator<Item = AxialCell> + '_ {
        (-radius..=radius).flat_map(move |dq| {
            let lo = (-radius).max(-dq - radius);
            let hi = radius.min(-dq + radius);
            (lo..=hi).map(move |dr| AxialCell::new(self.q + dq, self.r + dr))
        })
    }
}

/// Final placement of one entity. Pixel coordinates are derived at draw time
/// from `(q, r)` and the renderer's hex size.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexPosition {
    pub q: i32,
    pub r: i32,
    pub entity_id: String,
    pub entity_name: String,
}

impl HexPosition {
    #[inline]
    pub fn cell(&self) -> AxialCell {
        AxialCell::new(self.q, self.r)
    }

    #[inline]
    pub fn set_cell(&mut self, cell: AxialCell) {
        self.q = cell.q;
        self.r = cell.r;
    }

    #[inline]
    pub fn pixel(&self, size: f64) -> Vector2<f64> {
        axial_to_pixel(self.q, self.r, size)
    }
}

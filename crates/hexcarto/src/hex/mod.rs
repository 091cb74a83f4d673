//! Pointy-top hexagonal grid in axial coordinates.
//!
//! Purpose
//! - Convert between axial cells `(q, r)` and pixel space for a given hex
//!   size, snap arbitrary pixels to the nearest cell via cube rounding, and
//!   measure grid distance.
//! - Provide the outline helpers the renderer draws with. Pixel positions
//!   are never stored: `HexPosition` carries `(q, r)` only and the renderer
//!   picks `size` from its viewport.
//!
//! Conventions
//! - Axial `(q, r)` with implied cube `s = -q - r`.
//! - Pixel `y` grows downwards (screen space).
//! - Neighbour order is E, NE, NW, W, SW, SE (see `DIRECTIONS`).

mod convert;
mod types;

pub use convert::{
    axial_to_pixel, cube_round, hex_corners, hex_distance, hex_svg_path, pixel_to_axial, SQRT_3,
};
pub use types::{AxialCell, HexPosition, DIRECTIONS};

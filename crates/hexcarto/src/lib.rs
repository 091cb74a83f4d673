//! Hex cartogram layout engine.
//!
//! Places geographic entities (UK constituencies) on distinct cells of a
//! pointy-top hexagonal grid so that the layout follows geography while
//! giving dense regions room to breathe.
//!
//! Pipeline
//! - `geo`: match entities to boundary features, take centroids, project.
//! - `warp`: per-region density-adaptive expansion and peripheral pushes.
//! - `mask`: size the grid, snap points, build the candidate cell set.
//! - `lapjv`: exact minimum-cost assignment of points to candidate cells.
//! - `islands`: move crowded island seats one cell outward.
//! - `cache` / `layout`: memoised orchestration.
//!
//! API Policy
//! - `api` is the curated surface the CLI uses; module paths may move.

pub mod api;
pub mod cache;
pub mod cfg;
pub mod entity;
pub mod error;
pub mod geo;
pub mod hex;
pub mod islands;
pub mod lapjv;
pub mod layout;
pub mod mask;
pub mod warp;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::LayoutCfg;
pub use entity::{Entity, Region};
pub use hex::{AxialCell, HexPosition};
pub use layout::{run_layout, LayoutResult, LayoutService};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{GridCfg, IslandCfg, LayoutCfg, Push, RegionTables, WarpCfg};
    pub use crate::entity::{Entity, ProjectedPoint, Region};
    pub use crate::geo::{BoundarySet, NameNormalizer, UkNameNormalizer};
    pub use crate::hex::{axial_to_pixel, hex_distance, pixel_to_axial, AxialCell, HexPosition};
    pub use crate::layout::{run_layout, LayoutResult, LayoutService, LayoutStats};
    pub use nalgebra::Vector2 as Vec2;
}

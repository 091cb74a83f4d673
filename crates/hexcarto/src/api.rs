//! Curated surface for the CLI and other in-workspace callers (UNSTABLE).
//!
//! Prefer these re-exports over deep module paths; internal modules are
//! reorganised freely.

// Inputs
pub use crate::entity::{Entity, Region};
pub use crate::error::{LoadError, UnknownRegion};
pub use crate::geo::{BoundaryKeys, BoundarySet, NameNormalizer, UkNameNormalizer};
// Configuration
pub use crate::cfg::{GridCfg, IslandCfg, LayoutCfg, Push, RegionTables, WarpCfg};
pub use crate::geo::AlbersCfg;
pub use crate::lapjv::SolverCfg;
// Pipeline
pub use crate::cache::LayoutCache;
pub use crate::layout::{layout_projected, run_layout, LayoutResult, LayoutService, LayoutStats};
// Output and rendering helpers
pub use crate::hex::{axial_to_pixel, hex_corners, hex_svg_path, AxialCell, HexPosition};

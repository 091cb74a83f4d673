//! Geographic matching: entity → boundary feature → centroid → planar point.
//!
//! Purpose
//! - Resolve each entity to a boundary feature (code, exact name, then
//!   normalised name), take the feature's area-weighted centroid in
//!   lon/lat, and project it through an Albers equal-area conic.
//! - Entities without a match are dropped and reported, never fatal.
//!
//! Contract
//! - Boundary keys and entity names must be normalised by the same
//!   `NameNormalizer`, otherwise matches silently fail.

pub mod boundary;
pub mod centroid;
pub mod matcher;
pub mod names;
pub mod project;

pub use boundary::{BoundaryFeature, BoundaryKeys, BoundarySet, Geometry, Position, Ring};
pub use centroid::{geometry_centroid, polygon_centroid};
pub use matcher::{GeoMatcher, MatchOutcome};
pub use names::{fold_diacritics, NameNormalizer, UkNameNormalizer};
pub use project::{Albers, AlbersCfg};

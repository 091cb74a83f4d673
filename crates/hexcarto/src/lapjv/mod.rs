//! Linear assignment via Jonker–Volgenant shortest augmenting paths (LAPJV).
//!
//! Purpose
//! - Minimum-cost perfect matching on a square cost matrix, exact (no
//!   early exit, no approximation), deterministic for a given matrix.
//! - Rectangular problems are solved through `Padded`, which reports zero
//!   cost for dummy rows/columns instead of materialising a padded matrix.
//!
//! Phases
//! 1. Column reduction with provisional matches.
//! 2. Reduction transfer for rows matched exactly once.
//! 3. Augmenting row reduction (two passes).
//! 4. Dijkstra-style shortest augmenting path for every remaining free row.
//!
//! Tolerances
//! - `BIG` and `epsilon` are derived per call from the mean absolute entry
//!   of the matrix (see `SolverCfg`); `epsilon` never drops below a 1e-12
//!   fraction of the largest magnitude. A displaced row is reprocessed
//!   immediately only when its gap exceeds `epsilon` and the dual update
//!   took effect; anything else is deferred as a tie.

mod solve;
mod types;

pub use solve::{solve, solve_rect};
pub use types::{Assignment, CostMatrix, DenseCost, Padded, PartialAssignment, SolverCfg};

//! Grid sizing, snapping and the candidate cell mask.
//!
//! The hex size is chosen so the point cloud spans roughly
//! `target_cols × target_rows` cells; the grid origin sits at the cloud's
//! bounding-box minimum. The mask is every cell within `slack_radius` of a
//! snapped point, dilated by `buffer_rings`, then dilated further until it
//! holds at least as many cells as there are points.

use std::collections::BTreeSet;

use nalgebra::Vector2;

use crate::cfg::GridCfg;
use crate::entity::ProjectedPoint;
use crate::hex::{pixel_to_axial, AxialCell, SQRT_3};

/// Placement of the hex grid in warped space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridFit {
    pub size: f64,
    pub origin: Vector2<f64>,
}

impl GridFit {
    #[inline]
    pub fn to_local(&self, p: Vector2<f64>) -> Vector2<f64> {
        p - self.origin
    }

    #[inline]
    pub fn snap(&self, p: Vector2<f64>) -> AxialCell {
        let l = self.to_local(p);
        pixel_to_axial(l.x, l.y, self.size)
    }

    /// Centre of `cell` in warped space.
    #[inline]
    pub fn cell_center(&self, cell: AxialCell) -> Vector2<f64> {
        cell.to_pixel(self.size) + self.origin
    }
}

#[inline]
fn nonzero(x: f64) -> f64 {
    if x > 0.0 && x.is_finite() {
        x
    } else {
        1.0
    }
}

/// `None` for an empty cloud.
pub fn fit_grid(points: &[ProjectedPoint], cfg: &GridCfg) -> Option<GridFit> {
    let first = points.first()?.p;
    let (lo, hi) = points
        .iter()
        .fold((first, first), |(lo, hi), p| (lo.inf(&p.p), hi.sup(&p.p)));
    let (w, h) = (nonzero(hi.x - lo.x), nonzero(hi.y - lo.y));
    let cols = f64::from(cfg.target_cols.max(1));
    let rows = f64::from(cfg.target_rows.max(1));
    let size = (w / (cols * SQRT_3)).max(h / (rows * 1.5));
    Some(GridFit { size, origin: lo })
}

/// Candidate cells (sorted) and the snapped cells that seeded them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateMask {
    pub cells: Vec<AxialCell>,
    pub occupied: BTreeSet<AxialCell>,
}

impl CandidateMask {
    #[inline]
    pub fn contains(&self, cell: &AxialCell) -> bool {
        self.cells.binary_search(cell).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn dilate(set: &mut BTreeSet<AxialCell>) {
    let rim: Vec<AxialCell> = set.iter().flat_map(|c| c.neighbors()).collect();
    set.extend(rim);
}

pub fn build_mask(
    snapped: impl IntoIterator<Item = AxialCell>,
    cfg: &GridCfg,
    min_cells: usize,
) -> CandidateMask {
    let occupied: BTreeSet<AxialCell> = snapped.into_iter().collect();
    let slack = i32::try_from(cfg.slack_radius).unwrap_or(i32::MAX);
    let mut cells: BTreeSet<AxialCell> = BTreeSet::new();
    for c in &occupied {
        cells.extend(c.within(slack));
    }
    for _ in 0..cfg.buffer_rings {
        dilate(&mut cells);
    }
    let mut grown = 0usize;
    while !cells.is_empty() && cells.len() < min_cells {
        dilate(&mut cells);
        grown += 1;
    }
    if grown > 0 {
        tracing::debug!(grown, cells = cells.len(), min_cells, "mask grown to fit entities");
    }
    CandidateMask {
        cells: cells.into_iter().collect(),
        occupied,
    }
}

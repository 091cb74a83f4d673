//! Pipeline orchestration: match → warp → grid fit → mask → assignment → islands.
//!
//! Purpose
//! - `run_layout` turns entities plus boundaries into one `HexPosition` per
//!   matched entity, on distinct cells of the candidate mask.
//! - `LayoutService` owns configuration, the name normaliser and a
//!   `LayoutCache`, and memoises whole runs.
//!
//! Contract
//! - Infallible: unmatched entities are reported in `LayoutResult::unmatched`,
//!   empty input yields an empty result.
//! - Deterministic: output order is entity order and no step uses randomness
//!   or hash iteration order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::cache::LayoutCache;
use crate::cfg::LayoutCfg;
use crate::entity::{Entity, ProjectedPoint};
use crate::geo::{Albers, BoundarySet, GeoMatcher, NameNormalizer, UkNameNormalizer};
use crate::hex::HexPosition;
use crate::islands::separate_islands;
use crate::lapjv::solve_rect;
use crate::mask::{build_mask, fit_grid, CandidateMask};
use crate::warp::warp_points;

/// Run diagnostics. `hex_size` and `total_cost` are in warped projection units.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutStats {
    pub matched: usize,
    pub hex_size: f64,
    pub mask_cells: usize,
    pub total_cost: f64,
    pub islands_moved: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub positions: Vec<HexPosition>,
    /// Ids of entities without a usable boundary, in entity order.
    pub unmatched: Vec<String>,
    pub stats: LayoutStats,
}

/// Layout of already projected points. `points[k].entity` indexes `entities`.
pub fn layout_projected(
    points: &[ProjectedPoint],
    entities: &[Entity],
    cfg: &LayoutCfg,
) -> LayoutResult {
    layout_with_mask(points, entities, cfg).0
}

pub(crate) fn layout_with_mask(
    points: &[ProjectedPoint],
    entities: &[Entity],
    cfg: &LayoutCfg,
) -> (LayoutResult, CandidateMask) {
    let warped = warp_points(points, &cfg.regions, &cfg.warp);
    let Some(fit) = fit_grid(&warped.points, &cfg.grid) else {
        return Default::default();
    };
    let n = warped.points.len();
    let mask = build_mask(warped.points.iter().map(|p| fit.snap(p.p)), &cfg.grid, n);
    tracing::debug!(
        points = n,
        hex_size = fit.size,
        occupied = mask.occupied.len(),
        cells = mask.len(),
        "candidate mask"
    );

    let centers: Vec<Vector2<f64>> = mask.cells.iter().map(|&c| fit.cell_center(c)).collect();
    let solution = solve_rect(
        n,
        centers.len(),
        |i, j| (warped.points[i].p - centers[j]).norm_squared(),
        cfg.solver,
    );

    let mut positions = Vec::with_capacity(n);
    for (p, col) in warped.points.iter().zip(&solution.row_to_col) {
        // The mask has at least `n` cells, so every row has a real column.
        let (Some(j), Some(e)) = (*col, entities.get(p.entity)) else {
            tracing::warn!(entity = p.entity, "point left unplaced");
            continue;
        };
        let cell = mask.cells[j];
        positions.push(HexPosition {
            q: cell.q,
            r: cell.r,
            entity_id: e.id.clone(),
            entity_name: e.name.clone(),
        });
    }

    let islands_moved = separate_islands(
        &mut positions,
        &mask,
        &cfg.regions.island_keywords,
        &cfg.islands,
    );
    let stats = LayoutStats {
        matched: positions.len(),
        hex_size: fit.size,
        mask_cells: mask.len(),
        total_cost: solution.total_cost,
        islands_moved,
    };
    let result = LayoutResult {
        positions,
        unmatched: Vec::new(),
        stats,
    };
    (result, mask)
}

/// Full pipeline from entities and boundaries.
pub fn run_layout(
    entities: &[Entity],
    boundaries: &BoundarySet,
    normalizer: &dyn NameNormalizer,
    cfg: &LayoutCfg,
) -> LayoutResult {
    let matcher = GeoMatcher::new(boundaries, normalizer);
    let outcome = matcher.project_all(entities, &Albers::new(&cfg.projection));
    let mut result = layout_projected(&outcome.points, entities, cfg);
    result.unmatched = outcome
        .unmatched
        .iter()
        .map(|&k| entities[k].id.clone())
        .collect();
    tracing::info!(
        entities = entities.len(),
        placed = result.positions.len(),
        unmatched = result.unmatched.len(),
        mask_cells = result.stats.mask_cells,
        total_cost = result.stats.total_cost,
        "layout complete"
    );
    result
}

fn entities_fingerprint(entities: &[Entity]) -> u64 {
    let mut h = DefaultHasher::new();
    entities.hash(&mut h);
    h.finish()
}

/// Layout runner with a memo table.
///
/// The cache key combines the cache's boundary key with a hash of the entity
/// list, so one service can serve several elections over the same boundaries.
pub struct LayoutService {
    cfg: LayoutCfg,
    normalizer: Box<dyn NameNormalizer + Send + Sync>,
    cache: LayoutCache,
}

impl LayoutService {
    pub fn new(cfg: LayoutCfg) -> Self {
        Self {
            cfg,
            normalizer: Box::new(UkNameNormalizer),
            cache: LayoutCache::new(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: impl NameNormalizer + Send + Sync + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn with_cache(mut self, cache: LayoutCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cfg(&self) -> &LayoutCfg {
        &self.cfg
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn normalizer(&self) -> &dyn NameNormalizer {
        self.normalizer.as_ref()
    }

    pub fn key(&self, entities: &[Entity], boundaries: &BoundarySet) -> u64 {
        let mut h = DefaultHasher::new();
        self.cache.key(boundaries).hash(&mut h);
        entities_fingerprint(entities).hash(&mut h);
        h.finish()
    }

    pub fn layout(&self, entities: &[Entity], boundaries: &BoundarySet) -> Arc<LayoutResult> {
        let key = self.key(entities, boundaries);
        self.cache.get_or_insert_with(key, || {
            run_layout(entities, boundaries, self.normalizer.as_ref(), &self.cfg)
        })
    }
}

impl Default for LayoutService {
    fn default() -> Self {
        Self::new(LayoutCfg::default())
    }
}

//! Density-adaptive warp of projected points.
//!
//! Model
//! - Each region is scaled radially about its own arithmetic centroid by
//!   `clamp(sqrt(density / mean_density), min_factor, max_factor)`, where
//!   `density = count / area_weight`. With the default clamp `[1, 3]` sparse
//!   regions keep their shape and dense ones spread out.
//! - Afterwards every point of a region with a push entry is offset by
//!   `push × extent`, `extent` being the vertical extent of the expanded
//!   cloud (1 when the cloud is flat).
//!
//! Regions are processed in `Region` order so results do not depend on the
//! input order beyond the points' own order.

use std::collections::BTreeMap;

use nalgebra::Vector2;

use crate::cfg::{RegionTables, WarpCfg};
use crate::entity::{ProjectedPoint, Region};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionStats {
    pub region: Region,
    pub count: usize,
    pub centroid: Vector2<f64>,
    pub density: f64,
    pub factor: f64,
}

/// Warped points (same order as the input) and the per-region statistics used.
#[derive(Clone, Debug, Default)]
pub struct Warped {
    pub points: Vec<ProjectedPoint>,
    pub regions: Vec<RegionStats>,
}

impl Warped {
    pub fn stats(&self, r: Region) -> Option<&RegionStats> {
        self.regions.iter().find(|s| s.region == r)
    }
}

#[inline]
fn clamp_factor(x: f64, cfg: &WarpCfg) -> f64 {
    // max/min rather than f64::clamp: a misconfigured min > max must not panic.
    let f = x.max(cfg.min_factor).min(cfg.max_factor);
    if f.is_finite() {
        f
    } else {
        1.0
    }
}

/// Expansion factor per region from entity counts alone. Regions with a
/// zero count are ignored and do not enter the mean.
pub fn expansion_factors(
    counts: &BTreeMap<Region, usize>,
    tables: &RegionTables,
    cfg: &WarpCfg,
) -> BTreeMap<Region, f64> {
    let density: BTreeMap<Region, f64> = counts
        .iter()
        .filter(|(_, &n)| n > 0)
        .map(|(&r, &n)| (r, n as f64 / tables.weight(r)))
        .collect();
    if density.is_empty() {
        return BTreeMap::new();
    }
    let mean = density.values().sum::<f64>() / density.len() as f64;
    density
        .into_iter()
        .map(|(r, d)| (r, clamp_factor((d / mean).sqrt(), cfg)))
        .collect()
}

fn vertical_extent<'a>(points: impl Iterator<Item = &'a ProjectedPoint>) -> f64 {
    let (lo, hi) = points.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.p.y), hi.max(p.p.y))
    });
    let extent = hi - lo;
    if extent > 0.0 && extent.is_finite() {
        extent
    } else {
        1.0
    }
}

pub fn warp_points(points: &[ProjectedPoint], tables: &RegionTables, cfg: &WarpCfg) -> Warped {
    if points.is_empty() {
        return Warped::default();
    }
    let mut sums: BTreeMap<Region, (usize, Vector2<f64>)> = BTreeMap::new();
    for p in points {
        let e = sums.entry(p.region).or_insert((0, Vector2::zeros()));
        e.0 += 1;
        e.1 += p.p;
    }
    let counts: BTreeMap<Region, usize> = sums.iter().map(|(&r, &(n, _))| (r, n)).collect();
    let factors = expansion_factors(&counts, tables, cfg);

    let regions: Vec<RegionStats> = sums
        .iter()
        .map(|(&region, &(count, sum))| RegionStats {
            region,
            count,
            centroid: sum / count as f64,
            density: count as f64 / tables.weight(region),
            factor: factors.get(&region).copied().unwrap_or(1.0),
        })
        .collect();
    let by_region: BTreeMap<Region, &RegionStats> = regions.iter().map(|s| (s.region, s)).collect();

    let mut out: Vec<ProjectedPoint> = points
        .iter()
        .map(|p| {
            let s = by_region[&p.region];
            ProjectedPoint {
                p: s.centroid + (p.p - s.centroid) * s.factor,
                ..*p
            }
        })
        .collect();

    let extent = vertical_extent(out.iter());
    for p in &mut out {
        let push = tables.push(p.region);
        p.p += Vector2::new(push.dx, push.dy) * extent;
    }

    for s in &regions {
        tracing::debug!(region = %s.region, count = s.count, density = s.density, factor = s.factor, "warp");
    }
    Warped {
        points: out,
        regions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::Push;
    use proptest::prelude::*;

    fn flat_tables() -> RegionTables {
        RegionTables {
            area_weight: BTreeMap::new(),
            push: BTreeMap::new(),
            island_keywords: Vec::new(),
        }
    }

    /// Region A: 10 points in the unit square; B: 2 at (10,10)-(10,11); C: 1 at (-10,-10).
    fn three_regions() -> Vec<ProjectedPoint> {
        let mut pts = Vec::new();
        for k in 0..10 {
            let (x, y) = ((k % 4) as f64 / 3.0, (k / 4) as f64 / 2.0);
            pts.push(ProjectedPoint::new(k, Region::London, x, y));
        }
        pts.push(ProjectedPoint::new(10, Region::Scotland, 10.0, 10.0));
        pts.push(ProjectedPoint::new(11, Region::Scotland, 10.0, 11.0));
        pts.push(ProjectedPoint::new(12, Region::Wales, -10.0, -10.0));
        pts
    }

    fn spread(points: &[ProjectedPoint], r: Region) -> f64 {
        let sel: Vec<_> = points.iter().filter(|p| p.region == r).collect();
        let mut best: f64 = 0.0;
        for a in &sel {
            for b in &sel {
                best = best.max((a.p - b.p).norm());
            }
        }
        best
    }

    #[test]
    fn dense_region_expands_sparse_ones_do_not() {
        let pts = three_regions();
        let w = warp_points(&pts, &flat_tables(), &WarpCfg::default());
        let a = w.stats(Region::London).unwrap();
        assert!(a.factor > 1.0);
        assert_eq!(w.stats(Region::Scotland).unwrap().factor, 1.0);
        assert_eq!(w.stats(Region::Wales).unwrap().factor, 1.0);
        // sqrt(10 / (13/3))
        assert!((a.factor - (30.0f64 / 13.0).sqrt()).abs() < 1e-12);

        assert!(spread(&w.points, Region::London) > spread(&pts, Region::London) * 1.4);
        assert!((spread(&w.points, Region::Scotland) - 1.0).abs() < 1e-12);
        // Region centroid is a fixed point of the expansion.
        let c: Vector2<f64> = w.points[..10].iter().map(|p| p.p).sum::<Vector2<f64>>() / 10.0;
        assert!((c - a.centroid).norm() < 1e-12);
    }

    #[test]
    fn factor_is_capped() {
        let mut counts = BTreeMap::new();
        counts.insert(Region::London, 10_000);
        for r in [Region::Scotland, Region::Wales, Region::NorthEast] {
            counts.insert(r, 1);
        }
        let f = expansion_factors(&counts, &flat_tables(), &WarpCfg::default());
        assert_eq!(f[&Region::London], 3.0);
        assert_eq!(f[&Region::Wales], 1.0);
    }

    #[test]
    fn push_scales_with_vertical_extent() {
        let mut tables = flat_tables();
        tables.push.insert(Region::Wales, Push::new(-0.5, 0.0));
        let pts = vec![
            ProjectedPoint::new(0, Region::London, 0.0, 0.0),
            ProjectedPoint::new(1, Region::London, 0.0, 4.0),
            ProjectedPoint::new(2, Region::Wales, 1.0, 2.0),
        ];
        let cfg = WarpCfg {
            min_factor: 1.0,
            max_factor: 1.0,
        };
        let w = warp_points(&pts, &tables, &cfg);
        assert_eq!(w.points[2].p, Vector2::new(-1.0, 2.0));
        assert_eq!(w.points[0].p, Vector2::new(0.0, 0.0));
    }

    #[test]
    fn flat_cloud_uses_unit_extent() {
        let mut tables = flat_tables();
        tables.push.insert(Region::East, Push::new(0.25, 0.0));
        let pts = vec![ProjectedPoint::new(0, Region::East, 3.0, 7.0)];
        let w = warp_points(&pts, &tables, &WarpCfg::default());
        assert_eq!(w.points[0].p, Vector2::new(3.25, 7.0));
        assert_eq!(w.points[0].entity, 0);
    }

    #[test]
    fn empty_input() {
        let w = warp_points(&[], &RegionTables::default(), &WarpCfg::default());
        assert!(w.points.is_empty() && w.regions.is_empty());
        assert!(expansion_factors(&BTreeMap::new(), &flat_tables(), &WarpCfg::default()).is_empty());
    }

    proptest! {
        #[test]
        fn more_entities_never_shrink_a_region(
            counts in proptest::collection::vec(0usize..60, 12),
            target in 0usize..12,
            extra in 1usize..40,
        ) {
            let tables = RegionTables::default();
            let cfg = WarpCfg::default();
            let base: BTreeMap<Region, usize> =
                Region::ALL.iter().copied().zip(counts.iter().copied()).collect();
            let r = Region::ALL[target];
            let mut more = base.clone();
            *more.get_mut(&r).unwrap() += extra;
            let before = expansion_factors(&base, &tables, &cfg).get(&r).copied().unwrap_or(1.0);
            let after = expansion_factors(&more, &tables, &cfg)[&r];
            prop_assert!(after >= before - 1e-12, "{before} -> {after}");
        }

        #[test]
        fn factors_stay_in_clamp(counts in proptest::collection::vec(0usize..200, 12)) {
            let cfg = WarpCfg::default();
            let base: BTreeMap<Region, usize> =
                Region::ALL.iter().copied().zip(counts.iter().copied()).collect();
            for f in expansion_factors(&base, &RegionTables::default(), &cfg).values() {
                prop_assert!((cfg.min_factor..=cfg.max_factor).contains(f));
            }
        }
    }
}

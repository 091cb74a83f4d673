//! Layout configuration.
//!
//! - `GridCfg`: target grid shape and mask slack.
//! - `RegionTables`: per-region area weights, offsets, and island keywords.
//! - `WarpCfg`, `IslandCfg`: clamps and thresholds for the two post passes.
//! - `LayoutCfg`: everything above plus projection, boundary keys and solver
//!   tolerances. All sections default to the UK tables, so a partial JSON
//!   document only overrides what it names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::Region;
use crate::error::LoadError;
use crate::geo::{AlbersCfg, BoundaryKeys};
use crate::lapjv::SolverCfg;

/// Grid shape targets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridCfg {
    pub target_cols: u32,
    pub target_rows: u32,
    /// Cells within this distance of an occupied cell join the mask.
    pub slack_radius: u32,
    /// Extra rings grown around the slack region.
    pub buffer_rings: u32,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            target_cols: 40,
            target_rows: 48,
            slack_radius: 3,
            buffer_rings: 1,
        }
    }
}

/// Offset in units of the warped cloud's vertical extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Push {
    pub dx: f64,
    pub dy: f64,
}

impl Push {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Per-region constants. Regions missing from `area_weight` (or with a
/// non-positive weight) weigh 1.0; regions missing from `push` stay put.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionTables {
    /// Approximate land area, thousand km².
    pub area_weight: BTreeMap<Region, f64>,
    pub push: BTreeMap<Region, Push>,
    /// Lowercase substrings marking island constituencies.
    pub island_keywords: Vec<String>,
}

impl RegionTables {
    #[inline]
    pub fn weight(&self, r: Region) -> f64 {
        match self.area_weight.get(&r) {
            Some(&w) if w > 0.0 && w.is_finite() => w,
            _ => 1.0,
        }
    }

    #[inline]
    pub fn push(&self, r: Region) -> Push {
        self.push.get(&r).copied().unwrap_or_default()
    }
}

impl Default for RegionTables {
    /// United Kingdom.
    fn default() -> Self {
        use Region::*;
        let area_weight = [
            (NorthernIreland, 14.1),
            (Scotland, 77.9),
            (NorthEast, 8.6),
            (NorthWest, 14.2),
            (Yorkshire, 15.4),
            (Wales, 20.8),
            (WestMidlands, 13.0),
            (EastMidlands, 15.6),
            (East, 19.1),
            (SouthWest, 23.8),
            (London, 1.57),
            (SouthEast, 19.1),
        ]
        .into_iter()
        .collect();
        let push = [
            (NorthernIreland, Push::new(-0.06, 0.0)),
            (Scotland, Push::new(0.0, -0.04)),
            (SouthWest, Push::new(-0.02, 0.02)),
            (Wales, Push::new(-0.03, 0.0)),
            (East, Push::new(0.02, 0.0)),
        ]
        .into_iter()
        .collect();
        let island_keywords = [
            "orkney",
            "shetland",
            "na h-eileanan",
            "western isles",
            "isle of wight",
            "ynys mon",
            "anglesey",
            "argyll",
            "skye",
            "st ives",
        ]
        .map(String::from)
        .to_vec();
        Self {
            area_weight,
            push,
            island_keywords,
        }
    }
}

/// Clamp for the per-region expansion factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpCfg {
    pub min_factor: f64,
    pub max_factor: f64,
}

impl Default for WarpCfg {
    fn default() -> Self {
        Self {
            min_factor: 1.0,
            max_factor: 3.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandCfg {
    pub enabled: bool,
    /// An island with at least this many occupied neighbours is moved.
    pub crowded_threshold: usize,
}

impl Default for IslandCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            crowded_threshold: 4,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutCfg {
    pub grid: GridCfg,
    pub projection: AlbersCfg,
    pub regions: RegionTables,
    pub warp: WarpCfg,
    pub islands: IslandCfg,
    pub boundary_keys: BoundaryKeys,
    pub solver: SolverCfg,
}

impl LayoutCfg {
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uk_tables() {
        let t = RegionTables::default();
        assert_eq!(t.area_weight.len(), Region::ALL.len());
        assert_eq!(t.weight(Region::Scotland), 77.9);
        assert_eq!(t.push(Region::London), Push::default());
        assert_eq!(t.push(Region::NorthernIreland), Push::new(-0.06, 0.0));
        assert!(t.island_keywords.iter().all(|k| *k == k.to_lowercase()));
    }

    #[test]
    fn missing_region_weighs_one() {
        let mut t = RegionTables::default();
        t.area_weight.remove(&Region::Wales);
        t.area_weight.insert(Region::London, 0.0);
        assert_eq!(t.weight(Region::Wales), 1.0);
        assert_eq!(t.weight(Region::London), 1.0);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let cfg = LayoutCfg::from_json_str(
            r#"{"grid": {"slack_radius": 1}, "islands": {"enabled": false},
                "regions": {"area_weight": {"london": 2.0}}}"#,
        )
        .unwrap();
        assert_eq!(cfg.grid.slack_radius, 1);
        assert_eq!(cfg.grid.target_cols, 40);
        assert!(!cfg.islands.enabled);
        assert_eq!(cfg.islands.crowded_threshold, 4);
        assert_eq!(cfg.regions.weight(Region::London), 2.0);
        assert_eq!(cfg.regions.weight(Region::Scotland), 1.0);
        // Untouched tables keep their defaults.
        assert_eq!(cfg.regions.push, RegionTables::default().push);
        assert_eq!(cfg.projection, AlbersCfg::default());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = LayoutCfg::default();
        let s = serde_json::to_string(&cfg).unwrap();
        assert_eq!(LayoutCfg::from_json_str(&s).unwrap(), cfg);
    }

    #[test]
    fn bad_config_is_an_error() {
        assert!(LayoutCfg::from_json_str(r#"{"grid": {"target_cols": "many"}}"#).is_err());
        assert!(LayoutCfg::from_json_str(r#"{"regions": {"area_weight": {"atlantis": 1}}}"#).is_err());
    }
}

//! Island separation: nudge crowded island constituencies one cell outward.
//!
//! Single greedy pass in output order. A position whose name contains an
//! island keyword and whose cell has at least `crowded_threshold` occupied
//! neighbours moves to the free mask cell among its six neighbours with the
//! fewest occupied neighbours, provided that is strictly fewer than now.
//! Ties go to the earlier direction in `DIRECTIONS`.

use std::collections::BTreeSet;

use crate::cfg::IslandCfg;
use crate::geo::fold_diacritics;
use crate::hex::{AxialCell, HexPosition};
use crate::mask::CandidateMask;

pub fn is_island(name: &str, keywords: &[String]) -> bool {
    let name = fold_diacritics(&name.to_lowercase());
    keywords.iter().any(|k| name.contains(k.as_str()))
}

fn crowding(cell: AxialCell, occupied: &BTreeSet<AxialCell>) -> usize {
    cell.neighbors().iter().filter(|n| occupied.contains(n)).count()
}

/// Returns the number of positions moved.
pub fn separate_islands(
    positions: &mut [HexPosition],
    mask: &CandidateMask,
    keywords: &[String],
    cfg: &IslandCfg,
) -> usize {
    if !cfg.enabled || keywords.is_empty() {
        return 0;
    }
    let mut occupied: BTreeSet<AxialCell> = positions.iter().map(HexPosition::cell).collect();
    let mut moved = 0;
    for pos in positions.iter_mut() {
        if !is_island(&pos.entity_name, keywords) {
            continue;
        }
        let here = pos.cell();
        let crowded = crowding(here, &occupied);
        if crowded < cfg.crowded_threshold {
            continue;
        }
        // The mover vacates `here`, so it does not count against a target.
        occupied.remove(&here);
        let best = here
            .neighbors()
            .into_iter()
            .filter(|c| mask.contains(c) && !occupied.contains(c))
            .map(|c| (crowding(c, &occupied), c))
            .min_by_key(|&(n, _)| n);
        match best {
            Some((n, target)) if n < crowded => {
                tracing::debug!(entity = %pos.entity_id, from = ?here, to = ?target, crowded, after = n, "island moved");
                occupied.insert(target);
                pos.set_cell(target);
                moved += 1;
            }
            _ => {
                occupied.insert(here);
            }
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{GridCfg, RegionTables};
    use crate::mask::build_mask;

    fn pos(q: i32, r: i32, name: &str) -> HexPosition {
        HexPosition {
            q,
            r,
            entity_id: name.to_lowercase(),
            entity_name: name.to_string(),
        }
    }

    fn keywords() -> Vec<String> {
        RegionTables::default().island_keywords
    }

    #[test]
    fn keyword_matching() {
        let k = keywords();
        assert!(is_island("Orkney and Shetland", &k));
        assert!(is_island("Ynys Môn", &k));
        assert!(is_island("Na h-Eileanan an Iar", &k));
        assert!(is_island("Isle of Wight East", &k));
        assert!(!is_island("Bath", &k));
    }

    /// Island at the origin with its E, NE, NW and W neighbours taken.
    fn crowded_island() -> Vec<HexPosition> {
        let mut v = vec![pos(0, 0, "Isle of Wight")];
        for (k, c) in AxialCell::new(0, 0).neighbors()[..4].iter().enumerate() {
            v.push(pos(c.q, c.r, &format!("Mainland {k}")));
        }
        v
    }

    #[test]
    fn crowded_island_moves_outward() {
        let mut v = crowded_island();
        let mask = build_mask(v.iter().map(HexPosition::cell), &GridCfg::default(), v.len());
        let moved = separate_islands(&mut v, &mask, &keywords(), &IslandCfg::default());
        assert_eq!(moved, 1);
        let c = v[0].cell();
        assert_eq!(c.distance(AxialCell::new(0, 0)), 1);
        // SW and SE each touch one occupied cell; the tie goes to SW.
        assert_eq!(c, AxialCell::new(-1, 1));
        let cells: BTreeSet<_> = v.iter().map(HexPosition::cell).collect();
        assert_eq!(cells.len(), v.len());
    }

    #[test]
    fn uncrowded_or_disabled_stays() {
        let mut v = crowded_island();
        v.pop();
        let mask = build_mask(v.iter().map(HexPosition::cell), &GridCfg::default(), v.len());
        assert_eq!(separate_islands(&mut v, &mask, &keywords(), &IslandCfg::default()), 0);

        let mut v = crowded_island();
        let cfg = IslandCfg {
            enabled: false,
            ..IslandCfg::default()
        };
        assert_eq!(separate_islands(&mut v, &mask, &keywords(), &cfg), 0);
        assert_eq!(v[0].cell(), AxialCell::new(0, 0));
    }

    #[test]
    fn never_leaves_the_mask() {
        let mut v = crowded_island();
        let mask = CandidateMask {
            cells: v.iter().map(HexPosition::cell).collect::<BTreeSet<_>>().into_iter().collect(),
            occupied: BTreeSet::new(),
        };
        assert_eq!(separate_islands(&mut v, &mask, &keywords(), &IslandCfg::default()), 0);
    }

    #[test]
    fn surrounded_island_stays_put() {
        let mut v = vec![pos(0, 0, "Orkney")];
        for (k, c) in AxialCell::new(0, 0).within(2).filter(|c| *c != AxialCell::new(0, 0)).enumerate() {
            v.push(pos(c.q, c.r, &format!("Other {k}")));
        }
        let mask = build_mask(v.iter().map(HexPosition::cell), &GridCfg::default(), v.len());
        assert_eq!(separate_islands(&mut v, &mask, &keywords(), &IslandCfg::default()), 0);
    }
}

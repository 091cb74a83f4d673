//! Entity → boundary matching and projection.

use std::collections::HashMap;

use super::boundary::{BoundaryFeature, BoundarySet};
use super::centroid::geometry_centroid;
use super::names::NameNormalizer;
use super::project::Albers;
use crate::entity::{Entity, ProjectedPoint};

/// Projected points in entity order, plus the indices of entities that had
/// no usable boundary.
#[derive(Clone, Debug, Default)]
pub struct MatchOutcome {
    pub points: Vec<ProjectedPoint>,
    pub unmatched: Vec<usize>,
}

/// Lookup tables over a boundary set. When several features share a key the
/// first one wins.
pub struct GeoMatcher<'a> {
    boundaries: &'a BoundarySet,
    normalizer: &'a dyn NameNormalizer,
    by_code: HashMap<&'a str, usize>,
    by_name: HashMap<String, usize>,
    by_key: HashMap<&'a str, usize>,
}

impl<'a> GeoMatcher<'a> {
    pub fn new(boundaries: &'a BoundarySet, normalizer: &'a dyn NameNormalizer) -> Self {
        let mut by_code = HashMap::new();
        let mut by_name = HashMap::new();
        let mut by_key = HashMap::new();
        for (k, f) in boundaries.features.iter().enumerate() {
            if let Some(code) = f.code.as_deref() {
                by_code.entry(code).or_insert(k);
            }
            by_name.entry(f.name.to_lowercase()).or_insert(k);
            by_key.entry(f.key.as_str()).or_insert(k);
        }
        Self {
            boundaries,
            normalizer,
            by_code,
            by_name,
            by_key,
        }
    }

    /// Code equal to the entity id, then exact (case-insensitive) name, then
    /// normalised name.
    pub fn find(&self, entity: &Entity) -> Option<&'a BoundaryFeature> {
        let idx = self
            .by_code
            .get(entity.id.as_str())
            .or_else(|| self.by_name.get(&entity.name.to_lowercase()))
            .or_else(|| self.by_key.get(self.normalizer.normalize(&entity.name).as_str()))?;
        self.boundaries.features.get(*idx)
    }

    /// Match every entity, take its centroid and project it.
    pub fn project_all(&self, entities: &[Entity], projection: &Albers) -> MatchOutcome {
        let mut out = MatchOutcome::default();
        for (k, e) in entities.iter().enumerate() {
            let centroid = self
                .find(e)
                .and_then(|f| f.geometry.as_ref())
                .and_then(geometry_centroid);
            match centroid {
                Some(c) => {
                    let p = projection.project_vec(c);
                    out.points.push(ProjectedPoint {
                        entity: k,
                        region: e.region,
                        p,
                    });
                }
                None => out.unmatched.push(k),
            }
        }
        if !out.unmatched.is_empty() {
            let ids: Vec<&str> = out.unmatched.iter().map(|&k| entities[k].id.as_str()).collect();
            tracing::warn!(count = ids.len(), ?ids, "entities without boundary dropped");
        }
        out
    }
}

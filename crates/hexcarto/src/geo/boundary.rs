//! Boundary collaborator: named features with polygon geometry.
//!
//! Features are read from a GeoJSON `FeatureCollection`. Names and codes come
//! from the first present property in `BoundaryKeys`; the lookup key is the
//! normalised name.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Read;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::names::NameNormalizer;
use crate::error::LoadError;

/// `[lon, lat]` in degrees. Extra ordinates (altitude) are ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let ords = Vec::<f64>::deserialize(d)?;
        if ords.len() < 2 {
            return Err(de::Error::invalid_length(ords.len(), &"at least two ordinates"));
        }
        Ok(Position {
            lon: ords[0],
            lat: ords[1],
        })
    }
}

pub type Ring = Vec<Position>;

/// Supported geometry kinds. Anything else has no centroid.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Outer ring followed by holes.
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Polygons as slices of rings (outer first).
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Geometry::Polygon { coordinates } => vec![coordinates.as_slice()],
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().map(|p| p.as_slice()).collect()
            }
            Geometry::Unsupported => Vec::new(),
        }
    }
}

/// Property names to read feature names and codes from, in priority order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryKeys {
    pub name: Vec<String>,
    pub code: Vec<String>,
}

impl Default for BoundaryKeys {
    fn default() -> Self {
        Self {
            name: ["PCON24NM", "PCON13NM", "name", "NAME"].map(String::from).to_vec(),
            code: ["PCON24CD", "PCON13CD", "code", "id"].map(String::from).to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    pub code: Option<String>,
    /// Normalised name used for matching.
    pub key: String,
    pub geometry: Option<Geometry>,
}

impl BoundaryFeature {
    pub fn new(
        name: impl Into<String>,
        code: Option<String>,
        geometry: Option<Geometry>,
        normalizer: &dyn NameNormalizer,
    ) -> Self {
        let name = name.into();
        let key = normalizer.normalize(&name);
        Self {
            name,
            code,
            key,
            geometry,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundarySet {
    pub features: Vec<BoundaryFeature>,
}

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

fn scalar_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_property(props: &Map<String, Value>, keys: &[String]) -> Option<String> {
    keys.iter().find_map(|k| props.get(k).and_then(scalar_string))
}

impl BoundarySet {
    pub fn new(features: Vec<BoundaryFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Parse a GeoJSON `FeatureCollection`. Features without a usable name
    /// are skipped with a warning.
    pub fn from_geojson_str(
        s: &str,
        keys: &BoundaryKeys,
        normalizer: &dyn NameNormalizer,
    ) -> Result<Self, LoadError> {
        let raw: RawCollection = serde_json::from_str(s)?;
        Ok(Self::from_raw(raw, keys, normalizer))
    }

    pub fn from_geojson_reader<R: Read>(
        mut r: R,
        keys: &BoundaryKeys,
        normalizer: &dyn NameNormalizer,
    ) -> Result<Self, LoadError> {
        let mut s = String::new();
        r.read_to_string(&mut s)?;
        Self::from_geojson_str(&s, keys, normalizer)
    }

    fn from_raw(raw: RawCollection, keys: &BoundaryKeys, normalizer: &dyn NameNormalizer) -> Self {
        let empty = Map::new();
        let mut features = Vec::with_capacity(raw.features.len());
        for (index, f) in raw.features.into_iter().enumerate() {
            let props = f.properties.as_ref().unwrap_or(&empty);
            let Some(name) = first_property(props, &keys.name) else {
                tracing::warn!(index, "boundary feature has no name; skipped");
                continue;
            };
            let code = first_property(props, &keys.code).or_else(|| f.id.as_ref().and_then(scalar_string));
            features.push(BoundaryFeature::new(name, code, f.geometry, normalizer));
        }
        tracing::debug!(features = features.len(), "loaded boundaries");
        Self { features }
    }

    /// Content hash over names, codes and coordinates. Stable for identical
    /// input within one build of the crate.
    pub fn fingerprint(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.features.len().hash(&mut h);
        for f in &self.features {
            f.name.hash(&mut h);
            f.code.hash(&mut h);
            for poly in f.geometry.iter().flat_map(|g| g.polygons()) {
                poly.len().hash(&mut h);
                for ring in poly {
                    ring.len().hash(&mut h);
                    for p in ring {
                        p.lon.to_bits().hash(&mut h);
                        p.lat.to_bits().hash(&mut h);
                    }
                }
            }
        }
        h.finish()
    }

    /// Cheap era fingerprint: feature count plus the first and last names.
    /// Distinct boundary sets can collide; prefer `fingerprint`.
    pub fn sample_fingerprint(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.features.len().hash(&mut h);
        self.features.first().map(|f| &f.name).hash(&mut h);
        self.features.last().map(|f| &f.name).hash(&mut h);
        h.finish()
    }
}

//! Input files: entities (JSON, CSV, Parquet), GeoJSON boundaries, config.

use anyhow::{bail, Context, Result};
use hexcarto::api::{BoundarySet, Entity, LayoutCfg, NameNormalizer, Region};
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Election results file as produced by the ingestion scripts.
#[derive(Deserialize)]
struct ElectionFile {
    constituencies: Vec<ElectionRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElectionRow {
    constituency_id: Value,
    constituency_name: String,
    region: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntityFile {
    Plain(Vec<Entity>),
    Election(ElectionFile),
}

fn scalar(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_region(raw: &str, row: usize) -> Result<Region> {
    raw.parse::<Region>()
        .with_context(|| format!("row {row}: bad region"))
}

fn entities_from_json(bytes: &[u8]) -> Result<Vec<Entity>> {
    let file: EntityFile = serde_json::from_slice(bytes)
        .context("expected an array of {id, name, region} or an election file with `constituencies`")?;
    match file {
        EntityFile::Plain(v) => Ok(v),
        EntityFile::Election(f) => f
            .constituencies
            .iter()
            .enumerate()
            .map(|(row, c)| {
                let id = scalar(&c.constituency_id)
                    .with_context(|| format!("row {row}: constituencyId is not a string or number"))?;
                let region = scalar(&c.region)
                    .with_context(|| format!("row {row}: region is not a string or number"))?;
                Ok(Entity::new(id, c.constituency_name.trim(), parse_region(&region, row)?))
            })
            .collect(),
    }
}

fn string_column(df: &DataFrame, names: &[&str]) -> Result<Vec<Option<String>>> {
    let Some(name) = names.iter().copied().find(|n| df.column(n).is_ok()) else {
        bail!("missing column; expected one of {names:?}");
    };
    let col = df.column(name)?.cast(&DataType::String)?;
    Ok(col
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

fn entities_from_frame(df: &DataFrame) -> Result<Vec<Entity>> {
    let ids = string_column(df, &["id", "constituency_id", "constituencyId"])?;
    let names = string_column(df, &["name", "constituency_name", "constituencyName"])?;
    let regions = string_column(df, &["region"])?;
    let mut out = Vec::with_capacity(df.height());
    for (row, ((id, name), region)) in ids.into_iter().zip(names).zip(regions).enumerate() {
        let (Some(id), Some(name), Some(region)) = (id, name, region) else {
            bail!("row {row}: id, name and region are required");
        };
        out.push(Entity::new(id, name, parse_region(&region, row)?));
    }
    Ok(out)
}

pub fn load_entities(path: &Path) -> Result<Vec<Entity>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let entities = match ext.as_str() {
        "csv" => {
            let df = LazyCsvReader::new(path)
                .with_infer_schema_length(Some(100))
                .finish()?
                .collect()
                .with_context(|| format!("reading CSV {}", path.display()))?;
            entities_from_frame(&df)
        }
        "parquet" => {
            let df = LazyFrame::scan_parquet(path, ScanArgsParquet::default())?
                .collect()
                .with_context(|| format!("reading Parquet {}", path.display()))?;
            entities_from_frame(&df)
        }
        _ => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            entities_from_json(&bytes)
        }
    }
    .with_context(|| format!("loading entities from {}", path.display()))?;
    tracing::info!(count = entities.len(), path = %path.display(), "entities loaded");
    Ok(entities)
}

pub fn load_boundaries(
    path: &Path,
    cfg: &LayoutCfg,
    normalizer: &dyn NameNormalizer,
) -> Result<BoundarySet> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let set = BoundarySet::from_geojson_reader(BufReader::new(file), &cfg.boundary_keys, normalizer)
        .with_context(|| format!("reading GeoJSON {}", path.display()))?;
    tracing::info!(features = set.len(), path = %path.display(), "boundaries loaded");
    Ok(set)
}

/// Defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<LayoutCfg> {
    let Some(path) = path else {
        return Ok(LayoutCfg::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    LayoutCfg::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

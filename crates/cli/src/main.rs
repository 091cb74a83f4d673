use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hexcarto::api::{
    hex_svg_path, BoundarySet, HexPosition, LayoutCache, LayoutService, NameNormalizer, UkNameNormalizer,
};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod provenance;

#[derive(Parser)]
#[command(name = "hexcarto")]
#[command(about = "Hex cartogram layouts for UK constituencies")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Lay out entities on the hex grid and write HexPosition[] JSON
    Layout {
        /// JSON array, election JSON, CSV or Parquet
        #[arg(long)]
        entities: PathBuf,
        /// GeoJSON FeatureCollection of constituency boundaries
        #[arg(long)]
        boundaries: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Partial LayoutCfg JSON; omitted fields keep the UK defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also write an SVG preview with this hex size
        #[arg(long)]
        svg: Option<PathBuf>,
        #[arg(long, default_value_t = 10.0)]
        hex_size: f64,
        /// How the boundary set is fingerprinted for the layout cache
        #[arg(long, value_enum, default_value_t = BoundaryKey::Content)]
        boundary_key: BoundaryKey,
    },
    /// Print the normalised lookup key for each name
    Normalize { names: Vec<String> },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BoundaryKey {
    /// Hash of every feature's name, code and geometry
    Content,
    /// Feature count plus first and last names
    Sampled,
}

impl BoundaryKey {
    fn name(self) -> &'static str {
        match self {
            BoundaryKey::Content => "content",
            BoundaryKey::Sampled => "sampled",
        }
    }

    fn cache(self) -> LayoutCache {
        match self {
            BoundaryKey::Content => LayoutCache::with_key_fn(BoundarySet::fingerprint),
            BoundaryKey::Sampled => LayoutCache::with_key_fn(BoundarySet::sample_fingerprint),
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Layout {
            entities,
            boundaries,
            out,
            config,
            svg,
            hex_size,
            boundary_key,
        } => layout(
            &entities,
            &boundaries,
            &out,
            config.as_deref(),
            svg.as_deref(),
            hex_size,
            boundary_key,
        ),
        Action::Normalize { names } => normalize(&names),
        Action::Report => report(),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn layout(
    entities_path: &Path,
    boundaries_path: &Path,
    out: &Path,
    config: Option<&Path>,
    svg: Option<&Path>,
    hex_size: f64,
    boundary_key: BoundaryKey,
) -> Result<()> {
    tracing::info!(
        entities = %entities_path.display(),
        boundaries = %boundaries_path.display(),
        out = %out.display(),
        config = ?config,
        "layout"
    );
    let cfg = input::load_config(config)?;
    let service = LayoutService::new(cfg).with_cache(boundary_key.cache());
    let entities = input::load_entities(entities_path)?;
    let boundaries = input::load_boundaries(boundaries_path, service.cfg(), service.normalizer())?;

    let result = service.layout(&entities, &boundaries);

    ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(&result.positions)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let mut extra_outputs = Vec::new();
    if let Some(svg) = svg {
        ensure_parent(svg)?;
        fs::write(svg, render_svg(&result.positions, hex_size))
            .with_context(|| format!("writing {}", svg.display()))?;
        extra_outputs.push(svg.to_path_buf());
    }

    let mut inputs = vec![entities_path.to_path_buf(), boundaries_path.to_path_buf()];
    inputs.extend(config.map(Path::to_path_buf));
    let mut payload = provenance::Payload::new(serde_json::json!({
        "config": service.cfg(),
        "boundary_key": boundary_key.name(),
        "boundary_fingerprint": format!("{:016x}", service.cache().key(&boundaries)),
        "entities": entities.len(),
        "placed": result.positions.len(),
        "unmatched": result.unmatched,
        "stats": result.stats,
    }))
    .with_inputs(inputs);
    payload.extra_outputs = extra_outputs;
    let sidecar = provenance::write_sidecar(out, payload)?;
    tracing::info!(
        placed = result.positions.len(),
        unmatched = result.unmatched.len(),
        sidecar = %sidecar.display(),
        "written"
    );
    Ok(())
}

/// Plain SVG preview: one outlined hexagon per position, titled with the entity name.
fn render_svg(positions: &[HexPosition], size: f64) -> String {
    let centers: Vec<_> = positions.iter().map(|p| p.pixel(size)).collect();
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    if let Some(first) = centers.first() {
        (min_x, min_y, max_x, max_y) = (first.x, first.y, first.x, first.y);
    }
    for c in &centers {
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
    }
    let pad = 2.0 * size;
    let mut s = String::new();
    let _ = writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.3} {:.3} {:.3} {:.3}">"#,
        min_x - pad,
        min_y - pad,
        max_x - min_x + 2.0 * pad,
        max_y - min_y + 2.0 * pad
    );
    for (p, c) in positions.iter().zip(&centers) {
        let name = p
            .entity_name
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        let _ = writeln!(
            s,
            r##"  <path d="{}" fill="#dde" stroke="#445"><title>{}</title></path>"##,
            hex_svg_path(*c, size),
            name
        );
    }
    s.push_str("</svg>\n");
    s
}

fn normalize(names: &[String]) -> Result<()> {
    let normalizer = UkNameNormalizer;
    for name in names {
        println!("{name}\t{}", normalizer.normalize(name));
    }
    Ok(())
}

fn report() -> Result<()> {
    let mut obj = provenance::header();
    obj["params"] = serde_json::json!({});
    obj["outputs"] = serde_json::json!([]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_preview_has_one_path_per_position() {
        let positions = vec![
            HexPosition {
                q: 0,
                r: 0,
                entity_id: "1".into(),
                entity_name: "Orkney & Shetland".into(),
            },
            HexPosition {
                q: 3,
                r: -1,
                entity_id: "2".into(),
                entity_name: "Bath".into(),
            },
        ];
        let svg = render_svg(&positions, 10.0);
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(svg.contains("Orkney &amp; Shetland"));
        assert!(svg.starts_with("<svg"));
        assert!(render_svg(&[], 10.0).ends_with("</svg>\n"));
    }

    #[test]
    fn boundary_key_picks_the_cache_fingerprint() {
        let doc = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"PCON24NM":"Bath"},"geometry":null},
            {"type":"Feature","properties":{"PCON24NM":"Wells"},"geometry":null}]}"#;
        let set = BoundarySet::from_geojson_str(doc, &Default::default(), &UkNameNormalizer).unwrap();
        assert_eq!(BoundaryKey::Content.cache().key(&set), set.fingerprint());
        assert_eq!(BoundaryKey::Sampled.cache().key(&set), set.sample_fingerprint());
        assert_eq!(BoundaryKey::Sampled.name(), "sampled");
    }
}

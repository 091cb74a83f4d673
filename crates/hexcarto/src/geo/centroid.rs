//! Planar area-weighted centroids of polygons in lon/lat.

use nalgebra::Vector2;

use super::boundary::{Geometry, Position, Ring};

#[inline]
fn vec2(p: &Position) -> Vector2<f64> {
    Vector2::new(p.lon, p.lat)
}

/// Signed area and first moment (area × centroid) of a ring, computed
/// relative to its first vertex for precision. Closed and open rings agree.
fn ring_moments(ring: &[Position]) -> (f64, Vector2<f64>) {
    let Some(first) = ring.first() else {
        return (0.0, Vector2::zeros());
    };
    let o = vec2(first);
    let mut area2 = 0.0;
    let mut moment = Vector2::zeros();
    for k in 0..ring.len() {
        let a = vec2(&ring[k]) - o;
        let b = vec2(&ring[(k + 1) % ring.len()]) - o;
        let cross = a.x * b.y - b.x * a.y;
        area2 += cross;
        moment += (a + b) * cross;
    }
    let area = area2 / 2.0;
    // moment/6 is area × (centroid − o); shift back to absolute coordinates.
    (area, moment / 6.0 + o * area)
}

/// Unsigned area and first moment of a polygon: outer ring minus holes,
/// regardless of ring winding.
fn polygon_moments(rings: &[Ring]) -> (f64, Vector2<f64>) {
    let mut area = 0.0;
    let mut moment = Vector2::zeros();
    for (k, ring) in rings.iter().enumerate() {
        let (a, m) = ring_moments(ring);
        // Normalise orientation so each ring contributes |a|.
        let (a, m) = if a < 0.0 { (-a, -m) } else { (a, m) };
        if k == 0 {
            area += a;
            moment += m;
        } else {
            area -= a;
            moment -= m;
        }
    }
    (area, moment)
}

fn vertex_mean<'a>(rings: impl Iterator<Item = &'a Ring>) -> Option<Vector2<f64>> {
    let mut sum = Vector2::zeros();
    let mut n = 0usize;
    for p in rings.flatten() {
        sum += vec2(p);
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

pub fn polygon_centroid(rings: &[Ring]) -> Option<Vector2<f64>> {
    let (area, moment) = polygon_moments(rings);
    if area.abs() > f64::EPSILON {
        Some(moment / area)
    } else {
        vertex_mean(rings.iter())
    }
}

/// Area-weighted centroid over all polygons of the geometry. Zero-area
/// geometry falls back to the mean vertex; `None` when there are no vertices.
pub fn geometry_centroid(g: &Geometry) -> Option<Vector2<f64>> {
    let polys = g.polygons();
    let mut area = 0.0;
    let mut moment = Vector2::zeros();
    for rings in &polys {
        let (a, m) = polygon_moments(rings);
        area += a;
        moment += m;
    }
    if area.abs() > f64::EPSILON {
        Some(moment / area)
    } else {
        vertex_mean(polys.iter().flat_map(|rings| rings.iter()))
    }
}

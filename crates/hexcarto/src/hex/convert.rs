//! Axial/pixel conversion, cube rounding, distance and outlines.

use nalgebra::Vector2;

use super::types::AxialCell;

pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Centre of cell `(q, r)` for pointy-top hexes of circumradius `size`.
#[inline]
pub fn axial_to_pixel(q: i32, r: i32, size: f64) -> Vector2<f64> {
    let (q, r) = (q as f64, r as f64);
    Vector2::new(size * (SQRT_3 * q + SQRT_3 / 2.0 * r), size * (1.5 * r))
}

/// Nearest cell to pixel `(x, y)`.
#[inline]
pub fn pixel_to_axial(x: f64, y: f64, size: f64) -> AxialCell {
    let qf = (SQRT_3 / 3.0 * x - y / 3.0) / size;
    let rf = (2.0 / 3.0 * y) / size;
    cube_round(qf, rf)
}

/// Round fractional axial coordinates to a valid cell.
///
/// All three cube coordinates are rounded independently; the one with the
/// largest rounding error is then recomputed from the other two so that
/// `q + r + s = 0` holds.
pub fn cube_round(qf: f64, rf: f64) -> AxialCell {
    let sf = -qf - rf;
    let (mut q, mut r, s) = (qf.round(), rf.round(), sf.round());
    let dq = (q - qf).abs();
    let dr = (r - rf).abs();
    let ds = (s - sf).abs();
    if dq > dr && dq > ds {
        q = -r - s;
    } else if dr > ds {
        r = -q - s;
    }
    AxialCell::new(q as i32, r as i32)
}

#[inline]
pub fn hex_distance(q1: i32, r1: i32, q2: i32, r2: i32) -> i32 {
    ((q1 - q2).abs() + (q1 + r1 - q2 - r2).abs() + (r1 - r2).abs()) / 2
}

/// Corner offsets of a pointy-top hexagon, at `60°·i − 30°` for `i = 0..6`.
pub fn hex_corners(size: f64) -> [Vector2<f64>; 6] {
    std::array::from_fn(|i| {
        let angle = (60.0 * i as f64 - 30.0).to_radians();
        Vector2::new(size * angle.cos(), size * angle.sin())
    })
}

/// SVG path data for a hexagon centred at `center`.
pub fn hex_svg_path(center: Vector2<f64>, size: f64) -> String {
    let mut d = String::with_capacity(96);
    for (i, c) in hex_corners(size).iter().enumerate() {
        let p = center + c;
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd}{:.3},{:.3}", p.x, p.y));
    }
    d.push('Z');
    d
}

//! Albers equal-area conic projection (spherical, unit radius).
//!
//! Output is screen-oriented: `x` grows east, `y` grows south. Scale and
//! translation are irrelevant downstream because the grid fit rescales the
//! whole point cloud.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbersCfg {
    /// Standard parallels in degrees.
    pub parallels: [f64; 2],
    /// Latitude of the projection origin in degrees.
    pub origin_lat: f64,
    /// Central meridian in degrees.
    pub central_lon: f64,
}

impl Default for AlbersCfg {
    /// Centred on the United Kingdom.
    fn default() -> Self {
        Self {
            parallels: [50.0, 60.0],
            origin_lat: 55.4,
            central_lon: -4.4,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Albers {
    n: f64,
    c: f64,
    rho0: f64,
    lambda0: f64,
    cylindrical: bool,
    cos_phi1: f64,
}

impl Albers {
    pub fn new(cfg: &AlbersCfg) -> Self {
        let phi1 = cfg.parallels[0].to_radians();
        let phi2 = cfg.parallels[1].to_radians();
        let phi0 = cfg.origin_lat.to_radians();
        let n = (phi1.sin() + phi2.sin()) / 2.0;
        let c = phi1.cos().powi(2) + 2.0 * n * phi1.sin();
        // Parallels symmetric about the equator degenerate to a cylinder.
        let cylindrical = n.abs() < 1e-9;
        let rho0 = if cylindrical {
            0.0
        } else {
            (c - 2.0 * n * phi0.sin()).max(0.0).sqrt() / n
        };
        Self {
            n,
            c,
            rho0,
            lambda0: cfg.central_lon.to_radians(),
            cylindrical,
            cos_phi1: phi1.cos(),
        }
    }

    /// Project `(lon, lat)` in degrees.
    pub fn project(&self, lon: f64, lat: f64) -> Vector2<f64> {
        let lambda = lon.to_radians() - self.lambda0;
        let phi = lat.to_radians();
        if self.cylindrical {
            let x = lambda * self.cos_phi1;
            let y = phi.sin() / self.cos_phi1;
            return Vector2::new(x, -y);
        }
        let theta = self.n * lambda;
        let rho = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        Vector2::new(x, -y)
    }

    #[inline]
    pub fn project_vec(&self, lon_lat: Vector2<f64>) -> Vector2<f64> {
        self.project(lon_lat.x, lon_lat.y)
    }
}

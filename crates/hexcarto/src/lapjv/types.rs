//! Cost-matrix seam and solver results.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Square cost matrix accessed by index. Implementations must be cheap to
/// query; the solver reads entries many times.
pub trait CostMatrix {
    fn dim(&self) -> usize;
    fn cost(&self, i: usize, j: usize) -> f64;
}

/// Dense square matrix backed by `nalgebra`.
#[derive(Clone, Debug)]
pub struct DenseCost {
    m: DMatrix<f64>,
}

impl DenseCost {
    /// `None` unless `m` is square.
    pub fn new(m: DMatrix<f64>) -> Option<Self> {
        m.is_square().then_some(Self { m })
    }

    pub fn from_fn(dim: usize, f: impl FnMut(usize, usize) -> f64) -> Self {
        Self {
            m: DMatrix::from_fn(dim, dim, f),
        }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let dim = rows.len();
        if rows.iter().any(|r| r.len() != dim) {
            return None;
        }
        Some(Self::from_fn(dim, |i, j| rows[i][j]))
    }
}

impl CostMatrix for DenseCost {
    #[inline]
    fn dim(&self) -> usize {
        self.m.nrows()
    }
    #[inline]
    fn cost(&self, i: usize, j: usize) -> f64 {
        self.m[(i, j)]
    }
}

/// `rows × cols` cost function viewed as a square `max(rows, cols)` matrix.
/// Entries outside the real block are zero.
pub struct Padded<F> {
    rows: usize,
    cols: usize,
    f: F,
}

impl<F: Fn(usize, usize) -> f64> Padded<F> {
    pub fn new(rows: usize, cols: usize, f: F) -> Self {
        Self { rows, cols, f }
    }

    #[inline]
    pub fn is_real(&self, i: usize, j: usize) -> bool {
        i < self.rows && j < self.cols
    }
}

impl<F: Fn(usize, usize) -> f64> CostMatrix for Padded<F> {
    #[inline]
    fn dim(&self) -> usize {
        self.rows.max(self.cols)
    }
    #[inline]
    fn cost(&self, i: usize, j: usize) -> f64 {
        if self.is_real(i, j) {
            (self.f)(i, j)
        } else {
            0.0
        }
    }
}

/// Tolerance scheme: `BIG = big_factor × mean|c|`, `epsilon = mean|c| / eps_divisor`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverCfg {
    pub big_factor: f64,
    pub eps_divisor: f64,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            big_factor: 10_000.0,
            eps_divisor: 10_000.0,
        }
    }
}

/// Complete assignment on the square matrix, with final dual values.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub row_to_col: Vec<usize>,
    pub col_to_row: Vec<usize>,
    pub total_cost: f64,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

/// Assignment restricted to the real rows of a rectangular problem.
/// A row is `None` only when there are more rows than columns.
#[derive(Clone, Debug, Default)]
pub struct PartialAssignment {
    pub row_to_col: Vec<Option<usize>>,
    pub total_cost: f64,
}

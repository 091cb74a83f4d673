//! LAPJV phases over a `CostMatrix`.

use std::collections::VecDeque;

use super::types::{Assignment, CostMatrix, Padded, PartialAssignment, SolverCfg};

/// Solve the square assignment problem exactly.
///
/// Panics if `c.dim() == 0`; callers pad or short-circuit empty problems.
pub fn solve<C: CostMatrix + ?Sized>(c: &C, cfg: SolverCfg) -> Assignment {
    assert!(c.dim() > 0, "lapjv: cost matrix must be non-empty");
    Lapjv::new(c, cfg).run()
}

/// Solve a `rows × cols` problem given by `cost`, padding with zero-cost
/// dummies. Rows mapped to a dummy column come back as `None`.
pub fn solve_rect<F>(rows: usize, cols: usize, cost: F, cfg: SolverCfg) -> PartialAssignment
where
    F: Fn(usize, usize) -> f64,
{
    if rows == 0 || cols == 0 {
        return PartialAssignment {
            row_to_col: vec![None; rows],
            total_cost: 0.0,
        };
    }
    let padded = Padded::new(rows, cols, cost);
    let full = solve(&padded, cfg);
    let row_to_col = full.row_to_col[..rows]
        .iter()
        .map(|&j| (j < cols).then_some(j))
        .collect();
    PartialAssignment {
        row_to_col,
        // Dummy entries cost zero, so the square optimum is the real one.
        total_cost: full.total_cost,
    }
}

/// Relative resolution of the largest cost below which ARR gaps count as ties.
const EPS_RESOLUTION: f64 = 1e-12;

/// Solver state: primal assignment in both directions plus column duals.
struct Lapjv<'a, C: ?Sized> {
    c: &'a C,
    dim: usize,
    big: f64,
    eps: f64,
    rowsol: Vec<Option<usize>>,
    colsol: Vec<Option<usize>>,
    v: Vec<f64>,
}

impl<'a, C: CostMatrix + ?Sized> Lapjv<'a, C> {
    fn new(c: &'a C, cfg: SolverCfg) -> Self {
        let dim = c.dim();
        let mut sum_abs = 0.0;
        let mut max_abs = 0.0f64;
        for i in 0..dim {
            for j in 0..dim {
                let x = c.cost(i, j).abs();
                sum_abs += x;
                max_abs = max_abs.max(x);
            }
        }
        // Scale from magnitudes: a signed mean can cancel to almost nothing.
        let mut scale = sum_abs / (dim * dim) as f64;
        if !(scale.is_finite() && scale > 0.0) {
            scale = 1.0;
        }
        Self {
            c,
            dim,
            // BIG must dominate every reduced cost it stands in for.
            big: (cfg.big_factor * scale).max(4.0 * max_abs + 1.0),
            // Gaps below the resolution of the largest cost are noise.
            eps: (scale / cfg.eps_divisor).max(max_abs * EPS_RESOLUTION),
            rowsol: vec![None; dim],
            colsol: vec![None; dim],
            v: vec![0.0; dim],
        }
    }

    fn run(mut self) -> Assignment {
        let matches = self.column_reduction();
        let mut free = self.reduction_transfer(&matches);
        for _ in 0..2 {
            if free.is_empty() {
                break;
            }
            free = self.augmenting_row_reduction(free);
        }
        for row in free {
            self.augment(row);
        }
        self.finish()
    }

    #[inline]
    fn reduced(&self, i: usize, j: usize) -> f64 {
        self.c.cost(i, j) - self.v[j]
    }

    /// Phase 1: `v[j] = min_i c[i][j]`; each column proposes to its argmin row.
    /// Returns how many columns proposed to each row.
    fn column_reduction(&mut self) -> Vec<u32> {
        let mut matches = vec![0u32; self.dim];
        for j in (0..self.dim).rev() {
            let mut min = self.c.cost(0, j);
            let mut imin = 0;
            for i in 1..self.dim {
                let h = self.c.cost(i, j);
                if h < min {
                    min = h;
                    imin = i;
                }
            }
            self.v[j] = min;
            matches[imin] += 1;
            if matches[imin] == 1 {
                self.rowsol[imin] = Some(j);
                self.colsol[j] = Some(imin);
            } else if let Some(j1) = self.rowsol[imin].filter(|&j1| min < self.v[j1]) {
                self.rowsol[imin] = Some(j);
                self.colsol[j] = Some(imin);
                self.colsol[j1] = None;
            } else {
                self.colsol[j] = None;
            }
        }
        matches
    }

    /// Phase 2: collect unmatched rows; for rows matched once, lower the
    /// matched column's dual down to the row's second-best reduced cost.
    fn reduction_transfer(&mut self, matches: &[u32]) -> Vec<usize> {
        let mut free = Vec::new();
        for (i, &count) in matches.iter().enumerate() {
            match (count, self.rowsol[i]) {
                (0, _) => free.push(i),
                (1, Some(j1)) => {
                    let mut min = self.big;
                    for j in (0..self.dim).filter(|&j| j != j1) {
                        min = min.min(self.reduced(i, j));
                    }
                    if min < self.big {
                        self.v[j1] -= min;
                    }
                }
                _ => {}
            }
        }
        free
    }

    /// Lowest and second-lowest reduced cost of row `i` with the argmin column.
    fn two_lowest(&self, i: usize) -> (usize, f64, f64) {
        let mut j1 = 0;
        let mut umin = self.reduced(i, 0);
        let mut usubmin = self.big;
        for j in 1..self.dim {
            let h = self.reduced(i, j);
            if h < usubmin {
                if h >= umin {
                    usubmin = h;
                } else {
                    usubmin = umin;
                    umin = h;
                    j1 = j;
                }
            }
        }
        (j1, umin, usubmin)
    }

    /// Phase 3: one pass of augmenting row reduction. Each free row takes its
    /// cheapest column and that column's dual drops by the gap to the row's
    /// runner-up, so the row stays on a minimum. A displaced row is retried
    /// at once when the gap exceeds `eps` and actually moved the dual,
    /// otherwise it waits for the next pass (or for augmentation). Returns
    /// the rows still free.
    fn augmenting_row_reduction(&mut self, free: Vec<usize>) -> Vec<usize> {
        let mut queue: VecDeque<usize> = free.into();
        let mut deferred = Vec::new();
        while let Some(i) = queue.pop_front() {
            let (j1, umin, usubmin) = self.two_lowest(i);
            let gap = usubmin - umin;
            let before = self.v[j1];
            if usubmin < self.big {
                self.v[j1] -= gap;
            }
            // A gap absorbed by rounding leaves the dual unchanged.
            let moved = self.v[j1] != before;
            let displaced = self.colsol[j1];
            self.rowsol[i] = Some(j1);
            self.colsol[j1] = Some(i);
            if let Some(i0) = displaced {
                self.rowsol[i0] = None;
                if gap > self.eps && moved {
                    queue.push_front(i0);
                } else {
                    deferred.push(i0);
                }
            }
        }
        deferred
    }

    /// Phase 4: shortest augmenting path from `freerow` over reduced costs,
    /// then flip the alternating path and update duals of scanned columns.
    fn augment(&mut self, freerow: usize) {
        let dim = self.dim;
        let mut d: Vec<f64> = (0..dim).map(|j| self.reduced(freerow, j)).collect();
        let mut pred = vec![freerow; dim];
        // collist[..low] are scanned, collist[low..up] are at distance `min`
        // awaiting a scan, collist[up..] are still open.
        let mut collist: Vec<usize> = (0..dim).collect();
        let (mut low, mut up) = (0usize, 0usize);
        let mut ready = 0usize;
        let mut min = 0.0;

        let endofpath = 'search: loop {
            if up == low {
                ready = low;
                debug_assert!(up < dim, "lapjv: no free column reachable");
                min = d[collist[up]];
                up += 1;
                for k in up..dim {
                    let j = collist[k];
                    let h = d[j];
                    if h <= min {
                        if h < min {
                            up = low;
                            min = h;
                        }
                        collist[k] = collist[up];
                        collist[up] = j;
                        up += 1;
                    }
                }
                if let Some(&j) = collist[low..up].iter().find(|&&j| self.colsol[j].is_none()) {
                    break 'search j;
                }
            }

            let j1 = collist[low];
            low += 1;
            let Some(i) = self.colsol[j1] else {
                break 'search j1;
            };
            let h = self.reduced(i, j1) - min;
            for k in up..dim {
                let j = collist[k];
                let v2 = self.reduced(i, j) - h;
                if v2 < d[j] {
                    pred[j] = i;
                    if v2 == min {
                        if self.colsol[j].is_none() {
                            break 'search j;
                        }
                        collist[k] = collist[up];
                        collist[up] = j;
                        up += 1;
                    }
                    d[j] = v2;
                }
            }
        };

        for &j in &collist[..ready] {
            self.v[j] += d[j] - min;
        }

        let mut j = endofpath;
        loop {
            let i = pred[j];
            self.colsol[j] = Some(i);
            let next = self.rowsol[i].replace(j);
            if i == freerow {
                break;
            }
            match next {
                Some(n) => j = n,
                None => break,
            }
        }
    }

    fn finish(self) -> Assignment {
        let dim = self.dim;
        let mut row_to_col = vec![0usize; dim];
        let mut col_to_row = vec![0usize; dim];
        let mut u = vec![0.0; dim];
        let mut total_cost = 0.0;
        for (i, sol) in self.rowsol.iter().enumerate() {
            let j = sol.expect("lapjv: every row is assigned after augmentation");
            row_to_col[i] = j;
            col_to_row[j] = i;
            let c = self.c.cost(i, j);
            u[i] = c - self.v[j];
            total_cost += c;
        }
        Assignment {
            row_to_col,
            col_to_row,
            total_cost,
            u,
            v: self.v,
        }
    }
}

//! Pairwise Euclidean distances between observation sets.
//!
//! Two populations are built:
//! - *within*: positive × positive, symmetric, only the `j > i` pairs are
//!   computed and mirrored; the diagonal stays 0.
//! - *between*: positive × unlabelled, full rectangular matrix.
//!
//! Alongside the dense matrix, every computed pair is kept as a
//! [`RankedDistance`] sorted by `(distance asc, row asc, col asc)`. The index
//! tie-break makes the order, and therefore truncation, reproducible.
//!
//! Rows are computed in parallel with rayon and collected in row order before
//! being written into the matrix.

use smartcore::linalg::basic::arrays::{Array, Array2, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;

use log::{debug, info};
use rayon::prelude::*;

/// A computed distance and the matrix cell it lives in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedDistance {
    pub distance: f64,
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Square, symmetric, zero diagonal; only the upper triangle is ranked.
    Within,
    /// Rectangular; every cell is ranked.
    Between,
}

#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    pub matrix: DenseMatrix<f64>,
    pub sorted: Vec<RankedDistance>,
    pub kind: DistanceKind,
}

/// Euclidean (L2) distance between two equally long slices.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn rows_of(dm: &DenseMatrix<f64>) -> Vec<Vec<f64>> {
    let (n, f) = dm.shape();
    (0..n)
        .map(|r| (0..f).map(|c| *dm.get((r, c))).collect())
        .collect()
}

fn rank(pairs: &mut [RankedDistance]) {
    pairs.sort_unstable_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.row.cmp(&b.row))
            .then_with(|| a.col.cmp(&b.col))
    });
}

impl DistanceMatrix {
    /// Distances between every distinct pair of rows of `a`.
    pub fn within(a: &DenseMatrix<f64>) -> Self {
        let rows = rows_of(a);
        let n = rows.len();
        info!("Computing {} within-set distances for {} rows", n * n.saturating_sub(1) / 2, n);

        let per_row: Vec<Vec<RankedDistance>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| RankedDistance {
                        distance: euclidean(&rows[i], &rows[j]),
                        row: i,
                        col: j,
                    })
                    .collect()
            })
            .collect();

        let mut matrix = DenseMatrix::<f64>::zeros(n, n);
        let mut sorted = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for rd in per_row.into_iter().flatten() {
            matrix.set((rd.row, rd.col), rd.distance);
            matrix.set((rd.col, rd.row), rd.distance);
            sorted.push(rd);
        }
        rank(&mut sorted);
        debug!("Within-set distances ranked: {} pairs", sorted.len());

        Self {
            matrix,
            sorted,
            kind: DistanceKind::Within,
        }
    }

    /// Distances from every row of `a` (matrix rows) to every row of `b`
    /// (matrix columns).
    pub fn between(a: &DenseMatrix<f64>, b: &DenseMatrix<f64>) -> Self {
        let rows_a = rows_of(a);
        let rows_b = rows_of(b);
        let (n, m) = (rows_a.len(), rows_b.len());
        info!("Computing {} between-set distances ({} x {})", n * m, n, m);

        let per_row: Vec<Vec<RankedDistance>> = rows_a
            .par_iter()
            .enumerate()
            .map(|(i, ra)| {
                rows_b
                    .iter()
                    .enumerate()
                    .map(|(j, rb)| RankedDistance {
                        distance: euclidean(ra, rb),
                        row: i,
                        col: j,
                    })
                    .collect()
            })
            .collect();

        let mut matrix = DenseMatrix::<f64>::zeros(n, m);
        let mut sorted = Vec::with_capacity(n * m);
        for rd in per_row.into_iter().flatten() {
            matrix.set((rd.row, rd.col), rd.distance);
            sorted.push(rd);
        }
        rank(&mut sorted);
        debug!("Between-set distances ranked: {} pairs", sorted.len());

        Self {
            matrix,
            sorted,
            kind: DistanceKind::Between,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }

    /// Number of ranked (distinct) pairs.
    pub fn n_pairs(&self) -> usize {
        self.sorted.len()
    }

    pub fn min(&self) -> Option<f64> {
        self.sorted.first().map(|rd| rd.distance)
    }

    pub fn max(&self) -> Option<f64> {
        self.sorted.last().map(|rd| rd.distance)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        *self.matrix.get((row, col))
    }
}

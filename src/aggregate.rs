//! Similarity-weighted aggregation into one score per unlabelled row.
//!
//! `weighting = PP · PU` (n_pos × n_unlab), then `score[j] = Σ_i weighting[i, j]`.
//! An unlabelled row close to positives that are themselves well connected
//! inside the positive class collects more weight than one close to an
//! isolated positive.

use smartcore::linalg::basic::arrays::{Array, Array2, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;

use log::{debug, info};
use rayon::prelude::*;

use crate::similarity::SimilarityMatrix;

#[derive(Clone, Debug)]
pub struct Aggregation {
    pub weighting: DenseMatrix<f64>,
    pub scores: Vec<f64>,
}

/// Dense product `a · b`, rows computed in parallel.
///
/// # Panics
///
/// If the inner dimensions disagree.
pub fn matmul(a: &DenseMatrix<f64>, b: &DenseMatrix<f64>) -> DenseMatrix<f64> {
    let (n, k) = a.shape();
    let (kb, m) = b.shape();
    assert_eq!(k, kb, "matmul inner dimensions differ: ({},{}) x ({},{})", n, k, kb, m);

    let out_rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut row = vec![0.0f64; m];
            for p in 0..k {
                let aip = *a.get((i, p));
                if aip == 0.0 {
                    continue;
                }
                for (j, acc) in row.iter_mut().enumerate() {
                    *acc += aip * *b.get((p, j));
                }
            }
            row
        })
        .collect();

    let mut out = DenseMatrix::<f64>::zeros(n, m);
    for (i, row) in out_rows.into_iter().enumerate() {
        for (j, v) in row.into_iter().enumerate() {
            out.set((i, j), v);
        }
    }
    out
}

/// Sum each column of `x`.
pub fn column_sums(x: &DenseMatrix<f64>) -> Vec<f64> {
    let (n, m) = x.shape();
    let mut sums = vec![0.0f64; m];
    for i in 0..n {
        for (j, s) in sums.iter_mut().enumerate() {
            *s += *x.get((i, j));
        }
    }
    sums
}

/// Combine positive-positive and positive-unlabelled similarities into
/// positive-likeness scores, one per unlabelled column.
pub fn aggregate(pos_pos: &SimilarityMatrix, pos_unlab: &SimilarityMatrix) -> Aggregation {
    let (np, np2) = pos_pos.shape();
    let (np3, nu) = pos_unlab.shape();
    assert_eq!(np, np2, "positive-positive similarities must be square");
    assert_eq!(np, np3, "similarity matrices disagree on the positive count");

    debug!("Aggregating ({} x {}) · ({} x {})", np, np, np, nu);
    let weighting = matmul(&pos_pos.matrix, &pos_unlab.matrix);
    let scores = column_sums(&weighting);
    assert_eq!(scores.len(), nu);

    info!("Computed {} positive-likeness scores", scores.len());
    Aggregation { weighting, scores }
}

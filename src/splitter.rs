//! Split the standardised matrix into the Positive and Unlabelled sets.

use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use log::{debug, warn};

use crate::dataset::Label;
use crate::error::PuError;

/// Rows of one class together with their positions in the input table.
#[derive(Clone, Debug)]
pub struct ClassRows {
    pub data: DenseMatrix<f64>,
    /// Index of each row in the original dataset.
    pub source_rows: Vec<usize>,
}

impl ClassRows {
    pub fn len(&self) -> usize {
        self.source_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_rows.is_empty()
    }

    pub fn row(&self, i: usize) -> Vec<f64> {
        let f = self.data.shape().1;
        (0..f).map(|c| *self.data.get((i, c))).collect()
    }
}

#[derive(Clone, Debug)]
pub struct ClassSplit {
    pub positive: ClassRows,
    pub unlabelled: ClassRows,
    /// Rows whose label was neither `Positive` nor `Unlabelled`.
    pub dropped: Vec<usize>,
}

/// Partition `x` by label, keeping input order within each class.
///
/// Rows with any other label are left out of both sets. At least two
/// positives (one distinct pair) and one unlabelled row are required.
///
/// # Panics
///
/// If `labels.len()` differs from the row count of `x`.
pub fn split_classes(x: &DenseMatrix<f64>, labels: &[Label]) -> Result<ClassSplit, PuError> {
    let (n, f) = x.shape();
    assert_eq!(n, labels.len(), "one label per row is required");

    let mut pos = Vec::new();
    let mut unl = Vec::new();
    let mut dropped = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        match label {
            Label::Positive => pos.push(i),
            Label::Unlabelled => unl.push(i),
            Label::Other(_) => dropped.push(i),
        }
    }

    if !dropped.is_empty() {
        warn!(
            "{} row(s) have a Classification other than Positive/Unlabelled and are ignored",
            dropped.len()
        );
    }
    if pos.len() < 2 {
        return Err(PuError::InsufficientClass {
            class: "Positive",
            needed: 2,
            found: pos.len(),
        });
    }
    if unl.is_empty() {
        return Err(PuError::InsufficientClass {
            class: "Unlabelled",
            needed: 1,
            found: 0,
        });
    }
    debug!(
        "Split {} rows into {} positive and {} unlabelled ({} features)",
        n,
        pos.len(),
        unl.len(),
        f
    );

    Ok(ClassSplit {
        positive: select_rows(x, pos)?,
        unlabelled: select_rows(x, unl)?,
        dropped,
    })
}

fn select_rows(x: &DenseMatrix<f64>, idx: Vec<usize>) -> Result<ClassRows, PuError> {
    let f = x.shape().1;
    let rows: Vec<Vec<f64>> = idx
        .iter()
        .map(|&i| (0..f).map(|c| *x.get((i, c))).collect())
        .collect();
    let data = DenseMatrix::from_2d_vec(&rows).map_err(|e| PuError::Matrix(e.to_string()))?;
    Ok(ClassRows {
        data,
        source_rows: idx,
    })
}

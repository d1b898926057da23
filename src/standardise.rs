//! Feature matrix construction and per-column standardisation.
//!
//! The standardisation statistics are fitted over *all* observations (both
//! classes and any rows with other labels) before the classes are split.
//! Standard deviation is the population one (divide by `n`).
//!
//! A column with zero standard deviation cannot be standardised; it is
//! reported as [`PuError::ConstantFeature`] instead of producing NaNs.

use smartcore::linalg::basic::arrays::{Array, Array2, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;

use log::{debug, info, trace};

use crate::dataset::Dataset;
use crate::error::PuError;

/// Numeric observations × features matrix with column provenance.
#[derive(Clone, Debug)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub data: DenseMatrix<f64>,
}

impl FeatureMatrix {
    /// Build the raw (unstandardised) matrix from a loaded dataset.
    /// Identifier and `Classification` never appear here.
    pub fn from_dataset(ds: &Dataset) -> Result<Self, PuError> {
        let data = DenseMatrix::from_2d_vec(&ds.rows).map_err(|e| PuError::Matrix(e.to_string()))?;
        let (n, f) = data.shape();
        assert_eq!(n, ds.len(), "feature matrix must keep one row per observation");
        assert_eq!(f, ds.n_features());
        debug!("Feature matrix shape: ({}, {})", n, f);
        Ok(Self {
            names: ds.feature_names.clone(),
            data,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// Fit a [`Standardiser`] on this matrix and return the transformed copy.
    pub fn standardised(&self) -> Result<FeatureMatrix, PuError> {
        let scaler = Standardiser::fit(self)?;
        Ok(scaler.transform(self))
    }
}

/// Per-column mean and population standard deviation.
#[derive(Clone, Debug, PartialEq)]
pub struct Standardiser {
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl Standardiser {
    pub fn fit(x: &FeatureMatrix) -> Result<Self, PuError> {
        let (n, f) = x.shape();
        assert!(n > 0 && f > 0, "cannot standardise an empty matrix");
        let nf = n as f64;

        let mut means = vec![0.0f64; f];
        for r in 0..n {
            for (c, m) in means.iter_mut().enumerate() {
                *m += *x.data.get((r, c));
            }
        }
        means.iter_mut().for_each(|m| *m /= nf);

        let mut std_devs = vec![0.0f64; f];
        // constant means every value equals the first; the spread computed
        // for identical values can sit a few ulps above zero
        let mut varies = vec![false; f];
        for r in 0..n {
            for c in 0..f {
                let v = *x.data.get((r, c));
                varies[c] |= v != *x.data.get((0, c));
                let d = v - means[c];
                std_devs[c] += d * d;
            }
        }
        for (c, s) in std_devs.iter_mut().enumerate() {
            *s = (*s / nf).sqrt();
            trace!("column {} ({}): mean={:e}, std={:e}", c, x.names[c], means[c], s);
            if !varies[c] || *s <= 0.0 || !s.is_finite() {
                return Err(PuError::ConstantFeature(x.names[c].clone()));
            }
        }

        info!("Fitted standardiser over {} observations and {} features", n, f);
        Ok(Self { means, std_devs })
    }

    pub fn transform(&self, x: &FeatureMatrix) -> FeatureMatrix {
        let (n, f) = x.shape();
        assert_eq!(f, self.means.len(), "standardiser fitted on a different width");

        let mut out = DenseMatrix::<f64>::zeros(n, f);
        for r in 0..n {
            for c in 0..f {
                let v = (*x.data.get((r, c)) - self.means[c]) / self.std_devs[c];
                out.set((r, c), v);
            }
        }
        FeatureMatrix {
            names: x.names.clone(),
            data: out,
        }
    }
}

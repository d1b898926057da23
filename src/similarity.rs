//! Distance → similarity transform with tail truncation.
//!
//! Given a [`DistanceMatrix`] and a fraction `f` in [0, 1]:
//!
//! 1. Truncation: with `N` ranked pairs and `k = floor(N * f)`, if `k > 0` the
//!    `k` largest distances are clamped to the value at rank `N - k`
//!    (ascending). That value becomes the maximum distance. With `k == 0` the
//!    maximum is the true maximum.
//! 2. Diagonal forcing (within-set only): every diagonal cell (0) gets the
//!    maximum added, so self-pairs map to similarity 0.
//! 3. Rescaling: `S = (max - D) / (max - min)` where `min` is the smallest
//!    untruncated distance. The closest pair maps to 1, the truncated tail
//!    and the diagonal to 0.
//!
//! A population with `max == min` has no usable range and is rejected with
//! [`PuError::DegenerateDistances`].

use smartcore::linalg::basic::arrays::{Array, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;

use log::{debug, info, trace, warn};

use crate::config::validate_fraction;
use crate::distance::{DistanceKind, DistanceMatrix};
use crate::error::PuError;

/// Bounded similarities plus the bookkeeping of how they were scaled.
#[derive(Clone, Debug)]
pub struct SimilarityMatrix {
    pub matrix: DenseMatrix<f64>,
    pub kind: DistanceKind,
    /// Maximum distance after truncation (maps to similarity 0).
    pub max_distance: f64,
    /// Minimum untruncated distance (maps to similarity 1).
    pub min_distance: f64,
    /// How many of the largest distances were clamped.
    pub truncated: usize,
}

impl SimilarityMatrix {
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        *self.matrix.get((row, col))
    }
}

/// Converts distance populations into similarities with a fixed truncation
/// fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityEngine {
    fraction: f64,
}

impl SimilarityEngine {
    pub fn new(fraction: f64) -> Result<Self, PuError> {
        validate_fraction("truncation fraction", fraction)?;
        Ok(Self { fraction })
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Number of largest distances clamped for a population of `n_pairs`.
    pub fn n_truncated(&self, n_pairs: usize) -> usize {
        if self.fraction <= 0.0 {
            return 0;
        }
        (n_pairs as f64 * self.fraction).floor() as usize
    }

    /// Clamp the largest-distance tail in place and return the resulting
    /// maximum distance along with the number of clamped pairs.
    pub fn truncate(&self, dist: &mut DistanceMatrix) -> Result<(f64, usize), PuError> {
        let n_pairs = dist.n_pairs();
        let true_max = dist.max().ok_or_else(|| empty_population(&dist.kind))?;

        let k = self.n_truncated(n_pairs);
        if k == 0 {
            if self.fraction > 0.0 {
                warn!(
                    "truncation fraction {} removes no pairs out of {}",
                    self.fraction, n_pairs
                );
            }
            return Ok((true_max, 0));
        }

        let threshold = dist.sorted[n_pairs - k].distance;
        let symmetric = dist.kind == DistanceKind::Within;
        for rd in &dist.sorted[n_pairs - k..] {
            dist.matrix.set((rd.row, rd.col), threshold);
            if symmetric {
                dist.matrix.set((rd.col, rd.row), threshold);
            }
        }
        debug!(
            "Truncated {} of {} distances to threshold {:.6} (true max {:.6})",
            k, n_pairs, threshold, true_max
        );
        Ok((threshold, k))
    }

    /// Run truncation, diagonal forcing and rescaling on `dist`.
    pub fn transform(&self, mut dist: DistanceMatrix) -> Result<SimilarityMatrix, PuError> {
        let min_distance = dist.min().ok_or_else(|| empty_population(&dist.kind))?;
        let (max_distance, truncated) = self.truncate(&mut dist)?;

        let range = max_distance - min_distance;
        if range <= 0.0 || !range.is_finite() {
            return Err(PuError::DegenerateDistances {
                population: population_name(&dist.kind),
                value: max_distance,
            });
        }

        let (n, m) = dist.shape();
        if dist.kind == DistanceKind::Within {
            for i in 0..n {
                let d = *dist.matrix.get((i, i));
                dist.matrix.set((i, i), d + max_distance);
            }
            trace!("Diagonal forced to {:.6}", max_distance);
        }

        let mut matrix = dist.matrix;
        for i in 0..n {
            for j in 0..m {
                let d = *matrix.get((i, j));
                matrix.set((i, j), (max_distance - d) / range);
            }
        }
        info!(
            "{} similarities ({} x {}): min distance {:.6}, max distance {:.6}, {} truncated",
            population_name(&dist.kind),
            n,
            m,
            min_distance,
            max_distance,
            truncated
        );

        Ok(SimilarityMatrix {
            matrix,
            kind: dist.kind,
            max_distance,
            min_distance,
            truncated,
        })
    }
}

fn population_name(kind: &DistanceKind) -> &'static str {
    match kind {
        DistanceKind::Within => "positive-positive",
        DistanceKind::Between => "positive-unlabelled",
    }
}

fn empty_population(kind: &DistanceKind) -> PuError {
    match kind {
        DistanceKind::Within => PuError::InsufficientClass {
            class: "Positive",
            needed: 2,
            found: 0,
        },
        DistanceKind::Between => PuError::InsufficientClass {
            class: "Unlabelled",
            needed: 1,
            found: 0,
        },
    }
}

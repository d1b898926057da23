//! Error type shared by every fallible stage of the ranking pipeline.
//!
//! Input problems (bad files, unknown columns, unparsable cells) and numeric
//! degeneracy (constant features, zero-range distance populations) are
//! reported as values. Shape mismatches between internal arrays are
//! programming errors and panic instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PuError {
    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset contains no observations")]
    EmptyDataset,

    #[error("no feature columns remain after exclusions")]
    NoFeatures,

    #[error("required column `{0}` is missing from the header")]
    MissingColumn(String),

    #[error("feature `{0}` was requested for exclusion but is not in the header")]
    UnknownFeature(String),

    #[error("column `{0}` is always dropped and cannot be listed as an excluded feature")]
    ProtectedColumn(String),

    #[error("identifier `{0}` appears on more than one row")]
    DuplicateIdentifier(String),

    #[error("row `{row}`, column `{column}`: `{value}` is not a finite number")]
    InvalidValue {
        row: String,
        column: String,
        value: String,
    },

    #[error("feature `{0}` has zero standard deviation and cannot be standardised")]
    ConstantFeature(String),

    #[error("{population} distances have zero range (min = max = {value}); similarities are undefined")]
    DegenerateDistances { population: &'static str, value: f64 },

    #[error("need at least {needed} {class} observation(s), found {found}")]
    InsufficientClass {
        class: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("{name} must be a fraction in [0, 1], got {value}")]
    InvalidFraction { name: &'static str, value: f64 },

    #[error("invalid configuration file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("matrix construction failed: {0}")]
    Matrix(String),
}

impl PuError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PuError::Io {
            path: path.into(),
            source,
        }
    }
}

//! Run parameters: excluded features and the three fractions.
//!
//! Parameters can be set programmatically, loaded from a TOML file or both
//! (file first, explicit overrides after). Missing keys fall back to the
//! defaults below.
//!
//! ```toml
//! excluded_features = ["Length"]
//! positive_truncation = 0.5
//! unlabelled_truncation = 0.5
//! promotion_fraction = 0.1
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::PuError;

pub const DEFAULT_POSITIVE_TRUNCATION: f64 = 0.5;
pub const DEFAULT_UNLABELLED_TRUNCATION: f64 = 0.5;
pub const DEFAULT_PROMOTION_FRACTION: f64 = 0.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuParams {
    /// Feature columns dropped before the matrix is built.
    pub excluded_features: Vec<String>,
    /// Fraction of the largest positive-positive distances flattened.
    pub positive_truncation: f64,
    /// Fraction of the largest positive-unlabelled distances flattened.
    pub unlabelled_truncation: f64,
    /// Fraction of top-scoring unlabelled rows reported as `Positive`.
    pub promotion_fraction: f64,
}

impl Default for PuParams {
    fn default() -> Self {
        Self {
            excluded_features: Vec::new(),
            positive_truncation: DEFAULT_POSITIVE_TRUNCATION,
            unlabelled_truncation: DEFAULT_UNLABELLED_TRUNCATION,
            promotion_fraction: DEFAULT_PROMOTION_FRACTION,
        }
    }
}

impl PuParams {
    pub fn from_toml_str(s: &str) -> Result<Self, PuError> {
        let params: PuParams = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, PuError> {
        let path = path.as_ref();
        debug!("Reading parameters from {:?}", path);
        let text = fs::read_to_string(path).map_err(|e| PuError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), PuError> {
        validate_fraction("positive truncation", self.positive_truncation)?;
        validate_fraction("unlabelled truncation", self.unlabelled_truncation)?;
        validate_fraction("promotion fraction", self.promotion_fraction)?;
        Ok(())
    }
}

/// Parse a comma separated feature list, ignoring blanks.
pub fn parse_feature_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn validate_fraction(name: &'static str, value: f64) -> Result<(), PuError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PuError::InvalidFraction { name, value })
    }
}

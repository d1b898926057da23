//! Tab-separated dataset loading.
//!
//! The input is a header-bearing TSV file. The first column holds a unique row
//! identifier, one column is named `Classification`, and every other column is
//! a numeric feature. Features can be dropped by name at load time; the
//! identifier and `Classification` columns are always retained for labelling
//! and never become features.
//!
//! ```
//! use purank::dataset::{Dataset, Label};
//!
//! let tsv = "Id\tA\tB\tClassification\np1\t0.0\t1.0\tPositive\nu1\t2.0\t3.0\tUnlabelled\n";
//! let ds = Dataset::from_reader(tsv.as_bytes(), &["B".to_string()]).unwrap();
//! assert_eq!(ds.feature_names, vec!["A".to_string()]);
//! assert_eq!(ds.labels, vec![Label::Positive, Label::Unlabelled]);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info, trace};

use crate::error::PuError;

/// Header of the label column.
pub const CLASSIFICATION: &str = "Classification";

/// Label of an observation as found in the `Classification` column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Positive,
    Unlabelled,
    /// Any other value; such rows belong to neither class.
    Other(String),
}

impl Label {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Positive" => Label::Positive,
            "Unlabelled" => Label::Unlabelled,
            other => Label::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Positive => write!(f, "Positive"),
            Label::Unlabelled => write!(f, "Unlabelled"),
            Label::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A loaded table: identifiers, labels and the retained numeric features.
#[derive(Clone, Debug)]
pub struct Dataset {
    /// Full header as read from the file, before any exclusion.
    pub header: Vec<String>,
    pub identifier_column: String,
    pub ids: Vec<String>,
    pub labels: Vec<Label>,
    /// Names of the retained feature columns, in file order.
    pub feature_names: Vec<String>,
    /// Row-major raw feature values, one `Vec` per observation.
    pub rows: Vec<Vec<f64>>,
}

impl Dataset {
    /// Load a TSV file from disk, dropping the named feature columns.
    pub fn from_path<P: AsRef<Path>>(path: P, excluded: &[String]) -> Result<Self, PuError> {
        let path = path.as_ref();
        info!("Loading dataset from {:?}", path);
        let file = File::open(path).map_err(|e| PuError::io(path, e))?;
        let ds = Self::from_reader(file, excluded)?;
        info!(
            "Loaded {} observations with {} features ({} excluded)",
            ds.len(),
            ds.n_features(),
            excluded.len()
        );
        Ok(ds)
    }

    /// Parse TSV content from any reader.
    pub fn from_reader<R: Read>(reader: R, excluded: &[String]) -> Result<Self, PuError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        debug!("Header has {} columns: {:?}", header.len(), header);

        let class_idx = header
            .iter()
            .position(|h| h == CLASSIFICATION)
            .ok_or_else(|| PuError::MissingColumn(CLASSIFICATION.to_string()))?;
        if class_idx == 0 || header.len() < 2 {
            return Err(PuError::MissingColumn("identifier".to_string()));
        }
        let identifier_column = header[0].clone();

        let excluded = check_exclusions(&header, excluded)?;

        let feature_idx: Vec<usize> = (1..header.len())
            .filter(|&c| c != class_idx && !excluded.contains(header[c].as_str()))
            .collect();
        let feature_names: Vec<String> = feature_idx.iter().map(|&c| header[c].clone()).collect();
        trace!("Retained feature columns at positions {:?}", feature_idx);

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut labels = Vec::new();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            // Ragged rows are rejected by the reader, so positional access is in range.
            let id = record[0].to_string();
            let label = Label::parse(&record[class_idx]);

            let mut row = Vec::with_capacity(feature_idx.len());
            for &c in &feature_idx {
                let cell = &record[c];
                match cell.parse::<f64>() {
                    Ok(v) if v.is_finite() => row.push(v),
                    _ => {
                        return Err(PuError::InvalidValue {
                            row: id,
                            column: header[c].clone(),
                            value: cell.to_string(),
                        })
                    }
                }
            }

            if !seen.insert(id.clone()) {
                return Err(PuError::DuplicateIdentifier(id));
            }
            ids.push(id);
            labels.push(label);
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(PuError::EmptyDataset);
        }
        if feature_names.is_empty() {
            return Err(PuError::NoFeatures);
        }

        Ok(Self {
            header,
            identifier_column,
            ids,
            labels,
            feature_names,
            rows,
        })
    }

    /// Copy of this dataset without the named feature columns.
    ///
    /// Names must come from the file header; names already dropped at load
    /// time are accepted and have no further effect.
    pub fn without_features(&self, excluded: &[String]) -> Result<Self, PuError> {
        let excluded = check_exclusions(&self.header, excluded)?;
        let keep: Vec<usize> = (0..self.feature_names.len())
            .filter(|&c| !excluded.contains(self.feature_names[c].as_str()))
            .collect();
        if keep.is_empty() {
            return Err(PuError::NoFeatures);
        }
        debug!(
            "Dropping {} of {} loaded features",
            self.n_features() - keep.len(),
            self.n_features()
        );

        Ok(Self {
            header: self.header.clone(),
            identifier_column: self.identifier_column.clone(),
            ids: self.ids.clone(),
            labels: self.labels.clone(),
            feature_names: keep.iter().map(|&c| self.feature_names[c].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&c| row[c]).collect())
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Number of columns in the file, identifier and label included.
    pub fn n_original_columns(&self) -> usize {
        self.header.len()
    }
}

/// Exclusions must name header columns other than the identifier (always the
/// first column) and `Classification`.
fn check_exclusions<'a>(
    header: &[String],
    excluded: &'a [String],
) -> Result<HashSet<&'a str>, PuError> {
    let excluded: HashSet<&str> = excluded.iter().map(|s| s.as_str()).collect();
    for name in &excluded {
        if header.first().is_some_and(|id| id == name) || *name == CLASSIFICATION {
            return Err(PuError::ProtectedColumn(name.to_string()));
        }
        if !header.iter().any(|h| h == name) {
            return Err(PuError::UnknownFeature(name.to_string()));
        }
    }
    Ok(excluded)
}

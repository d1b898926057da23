//! # purank
//!
//! Positive-Unlabelled re-ranking: every unlabelled observation gets a
//! positive-likeness score from its similarity to the positive class, where
//! each positive's contribution is itself weighted by how well connected it
//! is inside the positive class.
//!
//! Pipeline: [`dataset`] → [`standardise`] → [`splitter`] → [`distance`] →
//! [`similarity`] → [`aggregate`] → [`output`]; [`builder::PuRankerBuilder`]
//! wires the stages together.
//!
//! ```
//! use purank::builder::PuRankerBuilder;
//! use purank::dataset::Dataset;
//!
//! let tsv = "Id\tx\ty\tClassification\n\
//!            p1\t0\t0\tPositive\n\
//!            p2\t1\t0\tPositive\n\
//!            p3\t0\t3\tPositive\n\
//!            u1\t0.5\t0.2\tUnlabelled\n\
//!            u2\t9\t9\tUnlabelled\n";
//! let ds = Dataset::from_reader(tsv.as_bytes(), &[]).unwrap();
//! let ranking = PuRankerBuilder::new()
//!     .with_positive_truncation(0.0)
//!     .with_unlabelled_truncation(0.0)
//!     .build(&ds)
//!     .unwrap();
//! assert!(ranking.scores[0] > ranking.scores[1]);
//! ```

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod output;
pub mod similarity;
pub mod splitter;
pub mod standardise;

#[cfg(test)]
mod tests;

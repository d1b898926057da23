//! Ranking result, top-fraction promotion and TSV output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::{debug, info};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::dataset::Label;
use crate::error::PuError;
use crate::similarity::SimilarityMatrix;

/// Scores for the Unlabelled Set, in input order, plus the intermediate
/// matrices they were derived from.
#[derive(Clone, Debug)]
pub struct PuRanking {
    /// Identifier of each unlabelled row.
    pub ids: Vec<String>,
    /// Position of each unlabelled row in the input table.
    pub source_rows: Vec<usize>,
    pub scores: Vec<f64>,
    /// 1-based rank by descending score.
    pub ranks: Vec<usize>,
    /// `Positive` for promoted rows, `Unlabelled` otherwise.
    pub predictions: Vec<Label>,
    pub pos_pos: SimilarityMatrix,
    pub pos_unlab: SimilarityMatrix,
    pub weighting: DenseMatrix<f64>,
}

/// Indices of `scores` ordered by descending score, ties by position.
pub fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then_with(|| a.cmp(&b)));
    order
}

/// 1-based rank of every score.
pub fn ranks(scores: &[f64]) -> Vec<usize> {
    let mut ranks = vec![0usize; scores.len()];
    for (r, i) in descending_order(scores).into_iter().enumerate() {
        ranks[i] = r + 1;
    }
    ranks
}

/// Label the top `floor(n * fraction)` rows `Positive` and the rest
/// `Unlabelled`. Scores themselves are left untouched.
pub fn promote(scores: &[f64], fraction: f64) -> Vec<Label> {
    let n_promoted = (scores.len() as f64 * fraction).floor() as usize;
    let mut labels = vec![Label::Unlabelled; scores.len()];
    for i in descending_order(scores).into_iter().take(n_promoted) {
        labels[i] = Label::Positive;
    }
    debug!("Promoted {} of {} unlabelled rows", n_promoted, scores.len());
    labels
}

impl PuRanking {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn n_promoted(&self) -> usize {
        self.predictions
            .iter()
            .filter(|l| **l == Label::Positive)
            .count()
    }

    /// `(id, score)` pairs sorted by descending score.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        descending_order(&self.scores)
            .into_iter()
            .map(|i| (self.ids[i].as_str(), self.scores[i]))
            .collect()
    }

    /// Write one tab-separated line per unlabelled row, in input order.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), PuError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);
        wtr.write_record(["Identifier", "Score", "Rank", "Prediction"])?;
        for i in 0..self.len() {
            wtr.write_record([
                self.ids[i].clone(),
                self.scores[i].to_string(),
                self.ranks[i].to_string(),
                self.predictions[i].to_string(),
            ])?;
        }
        wtr.flush().map_err(|e| PuError::Csv(e.into()))?;
        Ok(())
    }

    pub fn write_tsv<P: AsRef<Path>>(&self, path: P) -> Result<(), PuError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| PuError::io(path, e))?;
        self.write_to(file)?;
        info!("Wrote {} scores to {:?}", self.len(), path);
        Ok(())
    }
}

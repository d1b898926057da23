use std::path::Path;

use crate::aggregate::aggregate;
use crate::config::PuParams;
use crate::dataset::Dataset;
use crate::distance::DistanceMatrix;
use crate::error::PuError;
use crate::output::{promote, ranks, PuRanking};
use crate::similarity::SimilarityEngine;
use crate::splitter::split_classes;
use crate::standardise::FeatureMatrix;

use log::{debug, info, trace};

/// Fluent configuration and execution of a positive-likeness ranking run.
///
/// ```no_run
/// use purank::builder::PuRankerBuilder;
///
/// let ranking = PuRankerBuilder::new()
///     .with_positive_truncation(0.3)
///     .with_unlabelled_truncation(0.3)
///     .run("proteins.tsv")
///     .unwrap();
/// ranking.write_tsv("scores.tsv").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct PuRankerBuilder {
    params: PuParams,
}

impl Default for PuRankerBuilder {
    fn default() -> Self {
        debug!("Creating PuRankerBuilder with default parameters");
        Self {
            params: PuParams::default(),
        }
    }
}

impl PuRankerBuilder {
    pub fn new() -> Self {
        info!("Initializing new PuRankerBuilder");
        Self::default()
    }

    /// Replace every parameter at once, e.g. with values read from a file.
    pub fn with_params(mut self, params: PuParams) -> Self {
        info!("Configuring from parameter set: {:?}", params);
        self.params = params;
        self
    }

    /// Feature columns to leave out of the ranking.
    pub fn with_excluded_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.excluded_features = features.into_iter().map(Into::into).collect();
        info!("Excluding features: {:?}", self.params.excluded_features);
        self
    }

    pub fn with_positive_truncation(mut self, fraction: f64) -> Self {
        info!("Setting positive truncation fraction: {}", fraction);
        self.params.positive_truncation = fraction;
        self
    }

    pub fn with_unlabelled_truncation(mut self, fraction: f64) -> Self {
        info!("Setting unlabelled truncation fraction: {}", fraction);
        self.params.unlabelled_truncation = fraction;
        self
    }

    pub fn with_promotion_fraction(mut self, fraction: f64) -> Self {
        info!("Setting promotion fraction: {}", fraction);
        self.params.promotion_fraction = fraction;
        self
    }

    pub fn params(&self) -> &PuParams {
        &self.params
    }

    /// Load `path` with the configured exclusions and rank it.
    pub fn run<P: AsRef<Path>>(self, path: P) -> Result<PuRanking, PuError> {
        self.params.validate()?;
        let ds = Dataset::from_path(path, &self.params.excluded_features)?;
        self.build(&ds)
    }

    /// Rank an already loaded dataset, first dropping any configured
    /// excluded features it still carries.
    ///
    /// Stages:
    ///   1) raw feature matrix, standardised over all rows
    ///   2) split into Positive / Unlabelled
    ///   3) positive-positive and positive-unlabelled distances
    ///   4) truncation + rescaling into similarities
    ///   5) aggregation into scores, ranks and promotions
    pub fn build(self, ds: &Dataset) -> Result<PuRanking, PuError> {
        self.params.validate()?;
        let filtered;
        let ds = if self.params.excluded_features.is_empty() {
            ds
        } else {
            filtered = ds.without_features(&self.params.excluded_features)?;
            &filtered
        };
        info!(
            "Ranking {} observations with {} features",
            ds.len(),
            ds.n_features()
        );
        debug!(
            "Build configuration: positive_truncation={}, unlabelled_truncation={}, promotion_fraction={}",
            self.params.positive_truncation,
            self.params.unlabelled_truncation,
            self.params.promotion_fraction
        );

        // 1) Standardise
        let standardised = FeatureMatrix::from_dataset(ds)?.standardised()?;

        // 2) Split
        let split = split_classes(&standardised.data, &ds.labels)?;
        trace!(
            "Positive rows: {:?}, unlabelled rows: {:?}",
            split.positive.source_rows,
            split.unlabelled.source_rows
        );

        // 3-4) Similarities
        let pos_pos = SimilarityEngine::new(self.params.positive_truncation)?
            .transform(DistanceMatrix::within(&split.positive.data))?;
        let pos_unlab = SimilarityEngine::new(self.params.unlabelled_truncation)?.transform(
            DistanceMatrix::between(&split.positive.data, &split.unlabelled.data),
        )?;

        // 5) Aggregate
        let agg = aggregate(&pos_pos, &pos_unlab);
        // inputs are finite and both ranges checked
        assert!(
            agg.scores.iter().all(|s| s.is_finite()),
            "aggregation produced a non-finite score"
        );

        let ids: Vec<String> = split
            .unlabelled
            .source_rows
            .iter()
            .map(|&r| ds.ids[r].clone())
            .collect();
        let ranking = PuRanking {
            ranks: ranks(&agg.scores),
            predictions: promote(&agg.scores, self.params.promotion_fraction),
            ids,
            source_rows: split.unlabelled.source_rows,
            scores: agg.scores,
            pos_pos,
            pos_unlab,
            weighting: agg.weighting,
        };

        info!(
            "Ranking completed: {} unlabelled scored, {} promoted",
            ranking.len(),
            ranking.n_promoted()
        );
        Ok(ranking)
    }
}

use crate::aggregate::{column_sums, matmul};
use crate::builder::PuRankerBuilder;
use crate::config::PuParams;
use crate::dataset::{Dataset, Label};
use crate::error::PuError;
use crate::tests::{cluster_dataset, init};

use approx::relative_eq;
use std::io::Write;

fn write_tmp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_builder_defaults() {
    init();
    let b = PuRankerBuilder::new();
    assert_eq!(b.params(), &PuParams::default());

    let b = PuRankerBuilder::new()
        .with_excluded_features(["a", "b"])
        .with_positive_truncation(0.1)
        .with_unlabelled_truncation(0.2)
        .with_promotion_fraction(0.3);
    assert_eq!(b.params().excluded_features, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(b.params().positive_truncation, 0.1);
    assert_eq!(b.params().unlabelled_truncation, 0.2);
    assert_eq!(b.params().promotion_fraction, 0.3);
}

#[test]
fn test_central_unlabelled_outscores_distant_one() {
    init();
    let ds = cluster_dataset();
    let ranking = PuRankerBuilder::new()
        .with_positive_truncation(0.0)
        .with_unlabelled_truncation(0.0)
        .build(&ds)
        .unwrap();

    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking.ids, vec!["U1", "U2"]);
    assert_eq!(ranking.source_rows, vec![4, 5]);
    assert!(ranking.scores[0] > ranking.scores[1]);
    assert_eq!(ranking.ranks, vec![1, 2]);
    assert_eq!(ranking.n_promoted(), 0);

    assert_eq!(ranking.pos_pos.shape(), (4, 4));
    assert_eq!(ranking.pos_unlab.shape(), (4, 2));
    for i in 0..4 {
        assert_eq!(ranking.pos_pos.get(i, i), 0.0);
        for j in 0..4 {
            assert_eq!(ranking.pos_pos.get(i, j), ranking.pos_pos.get(j, i));
        }
    }
}

#[test]
fn test_scores_are_column_sums_of_weighting() {
    let ds = cluster_dataset();
    let ranking = PuRankerBuilder::new().build(&ds).unwrap();

    let product = matmul(&ranking.pos_pos.matrix, &ranking.pos_unlab.matrix);
    let sums = column_sums(&product);
    assert_eq!(sums.len(), ranking.len());
    for (a, b) in sums.iter().zip(ranking.scores.iter()) {
        assert!(relative_eq!(*a, *b, epsilon = 1e-12));
    }
    assert_eq!(column_sums(&ranking.weighting), ranking.scores);
}

#[test]
fn test_default_truncation_flattens_distant_unlabelled() {
    // 8 positive-unlabelled pairs, half clamped: all four of U2's distances
    let ds = cluster_dataset();
    let ranking = PuRankerBuilder::new().build(&ds).unwrap();

    assert_eq!(ranking.pos_pos.truncated, 3);
    assert_eq!(ranking.pos_unlab.truncated, 4);
    for i in 0..4 {
        assert_eq!(ranking.pos_unlab.get(i, 1), 0.0);
    }
    assert_eq!(ranking.scores[1], 0.0);
    assert!(ranking.scores[0] > 0.0);
}

#[test]
fn test_three_positive_example() {
    let tsv = "\
Id\ta\tb\tClassification
P1\t0\t0\tPositive
P2\t2\t2\tPositive
P3\t0\t3\tPositive
U1\t0\t1\tUnlabelled
U2\t10\t10\tUnlabelled
";
    let ds = Dataset::from_reader(tsv.as_bytes(), &[]).unwrap();
    let ranking = PuRankerBuilder::new()
        .with_positive_truncation(0.0)
        .with_unlabelled_truncation(0.0)
        .build(&ds)
        .unwrap();
    assert!(ranking.scores[0] > ranking.scores[1]);
    for i in 0..3 {
        assert_eq!(ranking.pos_pos.get(i, i), 0.0);
    }
}

#[test]
fn test_two_positives_are_degenerate() {
    let tsv = "\
Id\ta\tb\tClassification
P1\t0\t0\tPositive
P2\t2\t2\tPositive
U1\t0\t1\tUnlabelled
U2\t10\t10\tUnlabelled
";
    let ds = Dataset::from_reader(tsv.as_bytes(), &[]).unwrap();
    let err = PuRankerBuilder::new()
        .with_positive_truncation(0.0)
        .build(&ds)
        .unwrap_err();
    assert!(matches!(
        err,
        PuError::DegenerateDistances { population: "positive-positive", .. }
    ));
}

#[test]
fn test_other_labels_are_not_scored() {
    let tsv = "\
Id\ta\tb\tClassification
P1\t0\t0\tPositive
P2\t1\t0\tPositive
P3\t0\t2\tPositive
N1\t5\t5\tNegative
U1\t0.5\t0.5\tUnlabelled
U2\t7\t6\tUnlabelled
";
    let ds = Dataset::from_reader(tsv.as_bytes(), &[]).unwrap();
    assert_eq!(ds.labels[3], Label::Other("Negative".to_string()));
    let ranking = PuRankerBuilder::new()
        .with_unlabelled_truncation(0.0)
        .build(&ds)
        .unwrap();
    assert_eq!(ranking.ids, vec!["U1", "U2"]);
    assert_eq!(ranking.source_rows, vec![4, 5]);
}

#[test]
fn test_run_from_file_with_exclusions_and_promotion() {
    init();
    let tsv = "\
Id\tf1\tnoise\tf2\tClassification
P1\t0.0\t100\t0.0\tPositive
P2\t1.0\t-40\t0.0\tPositive
P3\t0.0\t7\t1.5\tPositive
P4\t6.0\t-90\t5.0\tPositive
U1\t0.3\t55\t0.4\tUnlabelled
U2\t12.0\t3\t11.0\tUnlabelled
U3\t2.0\t-60\t1.0\tUnlabelled
";
    let input = write_tmp(tsv);
    let ranking = PuRankerBuilder::new()
        .with_excluded_features(["noise"])
        .with_positive_truncation(0.0)
        .with_unlabelled_truncation(0.0)
        .with_promotion_fraction(0.34)
        .run(input.path())
        .unwrap();

    assert_eq!(ranking.ids, vec!["U1", "U2", "U3"]);
    // floor(3 * 0.34) == 1
    assert_eq!(ranking.n_promoted(), 1);
    assert_eq!(ranking.predictions[0], Label::Positive);
    assert_eq!(ranking.predictions[1], Label::Unlabelled);
    assert_eq!(ranking.ranks[1], 3);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ranked.tsv");
    ranking.write_tsv(&out).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().nth(1).unwrap().starts_with("U1\t"));
}

#[test]
fn test_run_reports_constant_feature() {
    let tsv = "\
Id\tf1\tflat\tClassification
P1\t0\t1\tPositive
P2\t1\t1\tPositive
P3\t3\t1\tPositive
U1\t2\t1\tUnlabelled
";
    let input = write_tmp(tsv);
    let err = PuRankerBuilder::new().run(input.path()).unwrap_err();
    assert!(matches!(err, PuError::ConstantFeature(ref c) if c == "flat"));

    let ranking = PuRankerBuilder::new()
        .with_excluded_features(["flat"])
        .with_unlabelled_truncation(0.0)
        .run(input.path())
        .unwrap();
    assert_eq!(ranking.len(), 1);
}

#[test]
fn test_invalid_parameters_fail_before_loading() {
    let err = PuRankerBuilder::new()
        .with_positive_truncation(2.0)
        .run("/nonexistent/path.tsv")
        .unwrap_err();
    assert!(matches!(err, PuError::InvalidFraction { .. }));
}

#[test]
fn test_with_params_from_toml() {
    let params = PuParams::from_toml_str(
        "positive_truncation = 0.0\nunlabelled_truncation = 0.0\npromotion_fraction = 0.5\n",
    )
    .unwrap();
    let ranking = PuRankerBuilder::new()
        .with_params(params)
        .build(&cluster_dataset())
        .unwrap();
    assert_eq!(ranking.pos_pos.truncated, 0);
    assert_eq!(ranking.predictions, vec![Label::Positive, Label::Unlabelled]);
}

#[test]
fn test_tiny_scale_feature_ranks() {
    let tsv = "\
Id\tevalue\tClassification
P1\t1e-14\tPositive
P2\t3e-14\tPositive
P3\t7e-14\tPositive
U1\t2e-14\tUnlabelled
U2\t9e-14\tUnlabelled
";
    let ds = Dataset::from_reader(tsv.as_bytes(), &[]).unwrap();
    let ranking = PuRankerBuilder::new()
        .with_positive_truncation(0.0)
        .with_unlabelled_truncation(0.0)
        .build(&ds)
        .unwrap();
    // column sums of PP are (1, 1.5, 0.5); U1 scores 19/7, U2 6/7
    assert!(relative_eq!(ranking.scores[0], 19.0 / 7.0, epsilon = 1e-9));
    assert!(relative_eq!(ranking.scores[1], 6.0 / 7.0, epsilon = 1e-9));
    assert_eq!(ranking.ranks, vec![1, 2]);
}

#[test]
fn test_build_applies_configured_exclusions() {
    init();
    let tsv = "\
Id\tf1\tnoise\tf2\tClassification
P1\t0.0\t100\t0.0\tPositive
P2\t1.0\t-40\t0.0\tPositive
P3\t0.0\t7\t1.5\tPositive
P4\t6.0\t-90\t5.0\tPositive
U1\t0.3\t55\t0.4\tUnlabelled
U2\t12.0\t3\t11.0\tUnlabelled
";
    let full = Dataset::from_reader(tsv.as_bytes(), &[]).unwrap();
    let excluded = PuRankerBuilder::new()
        .with_excluded_features(["noise"])
        .build(&full)
        .unwrap();
    let reference = PuRankerBuilder::new().build(&cluster_dataset()).unwrap();
    let with_noise = PuRankerBuilder::new().build(&full).unwrap();

    for i in 0..4 {
        for j in 0..4 {
            assert!(relative_eq!(
                excluded.pos_pos.get(i, j),
                reference.pos_pos.get(i, j),
                epsilon = 1e-12
            ));
        }
    }
    for (a, b) in excluded.scores.iter().zip(reference.scores.iter()) {
        assert!(relative_eq!(*a, *b, epsilon = 1e-12));
    }
    assert_ne!(with_noise.scores, excluded.scores);

    let params = PuParams {
        excluded_features: vec!["noise".to_string()],
        ..PuParams::default()
    };
    let from_params = PuRankerBuilder::new().with_params(params).build(&full).unwrap();
    assert_eq!(from_params.scores, excluded.scores);

    let err = PuRankerBuilder::new()
        .with_excluded_features(["volume"])
        .build(&full)
        .unwrap_err();
    assert!(matches!(err, PuError::UnknownFeature(ref c) if c == "volume"));
}

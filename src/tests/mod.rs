mod test_builder;

use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::dataset::Dataset;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn dm(rows: &[&[f64]]) -> DenseMatrix<f64> {
    let v: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
    DenseMatrix::from_2d_vec(&v).unwrap()
}

/// Three well connected positives around the origin, one isolated positive,
/// one unlabelled row inside the cluster and one far from everything.
pub const CLUSTER_TSV: &str = "\
Id\tf1\tf2\tClassification
P1\t0.0\t0.0\tPositive
P2\t1.0\t0.0\tPositive
P3\t0.0\t1.5\tPositive
P4\t6.0\t5.0\tPositive
U1\t0.3\t0.4\tUnlabelled
U2\t12.0\t11.0\tUnlabelled
";

pub fn cluster_dataset() -> Dataset {
    Dataset::from_reader(CLUSTER_TSV.as_bytes(), &[]).unwrap()
}

//! Helpers shared by unit and integration tests.

use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Checks that a matrix has the expected shape and that every element is
/// within `tolerance` of `expected_data` (row-major).
/// Panics on the first difference.
pub fn check_matrix_near<T: MatNumeric>(
    actual: &Matrix<T>,
    expected_shape: (usize, usize),
    expected_data: &[T],
    tolerance: T,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    assert_eq!(actual.numel(), expected_data.len(), "Data length mismatch");
    for (i, (a, e)) in actual.as_slice().iter().zip(expected_data.iter()).enumerate() {
        let diff = (*a - *e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Deterministic generator for reproducible test inputs and initializations.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Matrix with entries drawn uniformly from `[-1, 1)`.
pub fn random_matrix<R: Rng>(rng: &mut R, rows: usize, cols: usize) -> Matrix<f64> {
    Matrix::from_fn(rows, cols, |_, _| rng.gen_range(-1.0..1.0))
}

/// Reduces `x` to the sum of its elements as `onesᵗ · x · ones`, using only
/// graph ops so the reduction is differentiable.
pub fn sum_to_scalar<T: MatNumeric>(graph: &mut Graph<T>, x: NodeId) -> Result<NodeId, MatGradError> {
    let (rows, cols) = graph.shape(x)?;
    let left = Matrix::ones(1, rows);
    let right = Matrix::ones(cols, 1);
    project_to_scalar(graph, x, &left, &right)
}

/// Reduces `x` to `leftᵗ · x · right` with `left: [1, rows]` and
/// `right: [cols, 1]`; the upstream gradient of `x` is then `leftᵗ · rightᵗ`.
pub fn project_to_scalar<T: MatNumeric>(
    graph: &mut Graph<T>,
    x: NodeId,
    left: &Matrix<T>,
    right: &Matrix<T>,
) -> Result<NodeId, MatGradError> {
    let left = graph.tensor(left.clone());
    let right = graph.tensor(right.clone());
    let row = graph.matmul(left, x)?;
    graph.matmul(row, right)
}

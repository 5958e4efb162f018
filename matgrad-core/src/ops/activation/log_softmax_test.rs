use super::*;
use crate::autograd::grad_check::{check_grad, GradCheckConfig};
use crate::utils::testing::{project_to_scalar, random_matrix, seeded_rng};
use approx::{assert_abs_diff_eq, assert_relative_eq};

#[test]
fn test_log_softmax_forward_columns_normalise() -> Result<(), MatGradError> {
    let mut graph = Graph::new();
    let x = graph.tensor(Matrix::new(vec![1.0_f64, 0.0, 2.0, 0.0, 3.0, 0.0], 3, 2)?);
    let y = log_softmax_op(&mut graph, x)?;
    let value = graph.value(y)?;
    assert_eq!(value.shape(), (3, 2));

    for c in 0..2 {
        let total: f64 = value.column(c).iter().map(|v| v.exp()).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }
    // Constant column: uniform distribution.
    assert_relative_eq!(value[(0, 1)], -(3.0_f64).ln(), epsilon = 1e-12);
    // Column 0 is log_softmax([1, 2, 3]).
    let lse = (1.0_f64.exp() + 2.0_f64.exp() + 3.0_f64.exp()).ln();
    assert_relative_eq!(value[(2, 0)], 3.0 - lse, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_log_softmax_large_logits_stay_finite() -> Result<(), MatGradError> {
    let mut graph = Graph::new();
    let x = graph.tensor(Matrix::new(vec![1000.0_f32, 0.0], 2, 1)?);
    let y = log_softmax_op(&mut graph, x)?;
    let value = graph.value(y)?;
    assert!(value.as_slice().iter().all(|v| v.is_finite()));
    assert_abs_diff_eq!(value[(0, 0)], 0.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_log_softmax_backward_sums_to_zero_per_column() -> Result<(), MatGradError> {
    let mut graph = Graph::new();
    let mut rng = seeded_rng(5);
    let x = graph.parameter(random_matrix(&mut rng, 4, 3), "x");
    let y = log_softmax_op(&mut graph, x)?;
    let left = random_matrix(&mut rng, 1, 4);
    let right = random_matrix(&mut rng, 3, 1);
    let loss = project_to_scalar(&mut graph, y, &left, &right)?;
    graph.backward(loss)?;

    // Adding a constant to a column does not change log_softmax.
    let grad = graph.gradient(x)?.expect("grad x");
    for total in grad.sum_rows().as_slice() {
        assert_abs_diff_eq!(*total, 0.0, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_log_softmax_grad_check() {
    let mut rng = seeded_rng(9);
    for &(rows, cols) in &[(1, 1), (3, 1), (4, 4), (2, 3)] {
        let x = random_matrix(&mut rng, rows, cols).scale(3.0);
        let left = random_matrix(&mut rng, 1, rows);
        let right = random_matrix(&mut rng, cols, 1);
        let result = check_grad(
            |graph, inputs| {
                let y = log_softmax_op(graph, inputs[0])?;
                project_to_scalar(graph, y, &left, &right)
            },
            &[x],
            GradCheckConfig::default(),
        );
        assert!(result.is_ok(), "grad check failed for {}x{}: {:?}", rows, cols, result);
    }
}

use super::*;
use crate::autograd::grad_check::{check_grad, GradCheckConfig};
use crate::utils::testing::{project_to_scalar, random_matrix, seeded_rng, sum_to_scalar};
use approx::assert_relative_eq;

#[test]
fn test_pow_forward() -> Result<(), MatGradError> {
    let mut graph = Graph::new();
    let x = graph.tensor(Matrix::new(vec![2.0_f64, 3.0, -1.0, 0.5], 2, 2)?);
    let y = pow_op(&mut graph, x, 2.0)?;
    assert_eq!(graph.value(y)?.as_slice(), &[4.0, 9.0, 1.0, 0.25]);
    assert_eq!(graph.op_tag(y)?, "pow");
    assert!(!graph.requires_grad(y)?);
    Ok(())
}

#[test]
fn test_pow_backward() -> Result<(), MatGradError> {
    let mut graph = Graph::new();
    let x = graph.parameter(Matrix::new(vec![2.0_f64, -1.0, 4.0], 1, 3)?, "x");
    let y = pow_op(&mut graph, x, 3.0)?;
    let loss = sum_to_scalar(&mut graph, y)?;
    graph.backward(loss)?;
    // 3 x²
    let grad = graph.gradient(x)?.expect("grad x");
    assert_relative_eq!(grad.as_slice(), [12.0, 3.0, 48.0].as_slice(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_pow_fractional_exponent() -> Result<(), MatGradError> {
    let mut graph = Graph::new();
    let x = graph.parameter(Matrix::scalar(4.0_f64), "x");
    let y = pow_op(&mut graph, x, 0.5)?;
    assert_relative_eq!(graph.item(y)?, 2.0);
    graph.backward(y)?;
    // 0.5 / sqrt(4)
    assert_relative_eq!(graph.gradient(x)?.expect("grad x")[(0, 0)], 0.25);
    Ok(())
}

#[test]
fn test_pow_grad_check() {
    let mut rng = seeded_rng(23);
    let cubic = random_matrix(&mut rng, 3, 4);
    // Strictly positive base for a non-integer exponent.
    let positive = random_matrix(&mut rng, 3, 4).map(|v| v.abs() + 0.5);
    let left = random_matrix(&mut rng, 1, 3);
    let right = random_matrix(&mut rng, 4, 1);
    for (base, exponent) in [(cubic, 3.0), (positive, 1.5)] {
        let result = check_grad(
            |graph, inputs| {
                let y = pow_op(graph, inputs[0], exponent)?;
                project_to_scalar(graph, y, &left, &right)
            },
            &[base],
            GradCheckConfig::default(),
        );
        assert!(result.is_ok(), "exponent {}: {:?}", exponent, result);
    }
}

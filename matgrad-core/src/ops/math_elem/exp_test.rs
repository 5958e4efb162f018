use super::*;
use crate::autograd::grad_check::{check_grad, GradCheckConfig};
use crate::utils::testing::{project_to_scalar, random_matrix, seeded_rng, sum_to_scalar};
use approx::assert_relative_eq;

#[test]
fn test_exp_forward_and_backward() -> Result<(), MatGradError> {
    let mut graph = Graph::new();
    let x = graph.parameter(Matrix::new(vec![0.0_f64, 1.0, -2.0], 1, 3)?, "x");
    let y = exp_op(&mut graph, x)?;
    assert_eq!(graph.op_tag(y)?, "exp");
    let expected = [1.0, 1.0_f64.exp(), (-2.0_f64).exp()];
    assert_relative_eq!(graph.value(y)?.as_slice(), expected.as_slice(), epsilon = 1e-12);

    let loss = sum_to_scalar(&mut graph, y)?;
    graph.backward(loss)?;
    let grad = graph.gradient(x)?.expect("grad x");
    assert_relative_eq!(grad.as_slice(), expected.as_slice(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_exp_untracked_has_no_rule() -> Result<(), MatGradError> {
    let mut graph = Graph::new();
    let x = graph.tensor(Matrix::scalar(1.0_f64));
    let y = exp_op(&mut graph, x)?;
    assert!(!graph.requires_grad(y)?);
    assert!(!graph.node(y)?.has_backward_rule());
    Ok(())
}

#[test]
fn test_exp_grad_check() {
    let mut rng = seeded_rng(31);
    let x = random_matrix(&mut rng, 2, 5);
    let left = random_matrix(&mut rng, 1, 2);
    let right = random_matrix(&mut rng, 5, 1);
    let result = check_grad(
        |graph, inputs| {
            let y = exp_op(graph, inputs[0])?;
            project_to_scalar(graph, y, &left, &right)
        },
        &[x],
        GradCheckConfig::default(),
    );
    assert!(result.is_ok(), "{:?}", result);
}

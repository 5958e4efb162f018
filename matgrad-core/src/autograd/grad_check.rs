//! Finite-difference verification of backward rules.

use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use log::debug;
use thiserror::Error;

/// Error type for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical_grad} != numerical {numerical_grad} (difference {difference})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Numerical gradient is not finite for input {input_index}, element {element_index}: loss+ {loss_plus}, loss- {loss_minus}")]
    NumericalGradNotFinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Input {input_index} has no gradient after the backward pass")]
    MissingAnalyticalGrad { input_index: usize },

    #[error("Graph error during gradient check: {0}")]
    Graph(#[from] MatGradError),
}

/// Perturbation and acceptance threshold for [`check_grad`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    /// Step of the centered difference `(f(x + ε) - f(x - ε)) / 2ε`.
    pub epsilon: f64,
    /// Accepted `|analytical - numerical| / (1 + max(|analytical|, |numerical|))`.
    pub tolerance: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            epsilon: 1e-6,
            tolerance: 1e-4,
        }
    }
}

/// Compares the gradients computed by `backward` with centered finite
/// differences.
///
/// `build` receives a fresh graph and one tracked leaf per entry of `inputs`
/// and must return a `1 x 1` node. It is called once for the analytical pass
/// and twice per input element for the numerical one, so it must be a pure
/// function of the input values.
pub fn check_grad<F>(build: F, inputs: &[Matrix<f64>], config: GradCheckConfig) -> Result<(), GradCheckError>
where
    F: Fn(&mut Graph<f64>, &[NodeId]) -> Result<NodeId, MatGradError>,
{
    let analytical = analytical_gradients(&build, inputs)?;

    for (input_index, input) in inputs.iter().enumerate() {
        let grad = &analytical[input_index];
        for element_index in 0..input.numel() {
            let loss_plus = evaluate_perturbed(&build, inputs, input_index, element_index, config.epsilon)?;
            let loss_minus = evaluate_perturbed(&build, inputs, input_index, element_index, -config.epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * config.epsilon);
            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNotFinite {
                    input_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }

            let analytical_grad = grad.as_slice()[element_index];
            let difference = (analytical_grad - numerical_grad).abs();
            let scale = 1.0 + analytical_grad.abs().max(numerical_grad.abs());
            if !(difference / scale <= config.tolerance) {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    element_index,
                    analytical_grad,
                    numerical_grad,
                    difference,
                });
            }
        }
    }
    debug!("check_grad: {} inputs passed", inputs.len());
    Ok(())
}

fn analytical_gradients<F>(build: &F, inputs: &[Matrix<f64>]) -> Result<Vec<Matrix<f64>>, GradCheckError>
where
    F: Fn(&mut Graph<f64>, &[NodeId]) -> Result<NodeId, MatGradError>,
{
    let mut graph = Graph::new();
    let leaves: Vec<NodeId> = inputs
        .iter()
        .enumerate()
        .map(|(i, value)| graph.parameter(value.clone(), format!("input{}", i)))
        .collect();
    let output = build(&mut graph, &leaves)?;
    graph.backward(output)?;

    leaves
        .iter()
        .enumerate()
        .map(|(input_index, &leaf)| match graph.gradient(leaf)? {
            Some(grad) => Ok(grad.clone()),
            None => Err(GradCheckError::MissingAnalyticalGrad { input_index }),
        })
        .collect()
}

fn evaluate_perturbed<F>(
    build: &F,
    inputs: &[Matrix<f64>],
    input_index: usize,
    element_index: usize,
    delta: f64,
) -> Result<f64, GradCheckError>
where
    F: Fn(&mut Graph<f64>, &[NodeId]) -> Result<NodeId, MatGradError>,
{
    let mut graph = Graph::new();
    let leaves: Vec<NodeId> = inputs
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let mut value = value.clone();
            if i == input_index {
                value.as_mut_slice()[element_index] += delta;
            }
            graph.tensor(value)
        })
        .collect();
    let output = build(&mut graph, &leaves)?;
    Ok(graph.item(output)?)
}

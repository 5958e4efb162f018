use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use std::sync::Arc;

// --- Backward Operation ---

/// `dX = dC ⊙ 1[x > 0]`. The subgradient at exactly zero is 0.
#[derive(Debug)]
struct ReluBackward<T: MatNumeric> {
    input_node: NodeId,
    input_value: Arc<Matrix<T>>,
}

impl<T: MatNumeric> BackwardOp<T> for ReluBackward<T> {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let grad_input = grad_output.zip_map(&self.input_value, |g, x| if x > T::zero() { g } else { T::zero() })?;
        Ok(vec![Some(grad_input)])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input_node]
    }
}

// --- Forward Operation ---

/// Rectified linear unit, `max(0, x)` element-wise.
pub fn relu_op<T: MatNumeric>(graph: &mut Graph<T>, x: NodeId) -> Result<NodeId, MatGradError> {
    let input_value = graph.value_arc(x)?;
    let output = input_value.map(|v| if v > T::zero() { v } else { T::zero() });

    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if graph.requires_grad(x)? {
        Some(Box::new(ReluBackward {
            input_node: x,
            input_value,
        }))
    } else {
        None
    };
    graph.record(output, "relu", &[x], grad_fn)
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;

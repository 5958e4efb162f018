use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;

/// Reshapes the upstream gradient back to the input's shape.
#[derive(Debug)]
struct ReshapeBackward {
    input_node: NodeId,
    input_shape: (usize, usize),
}

impl<T: MatNumeric> BackwardOp<T> for ReshapeBackward {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let grad_input = grad_output.reshaped(self.input_shape.0, self.input_shape.1)?;
        Ok(vec![Some(grad_input)])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input_node]
    }
}

/// Reinterprets `x` as a `rows x cols` matrix, keeping row-major element order.
///
/// # Errors
/// `MatGradError::ShapeMismatch` if `rows * cols` differs from the element count.
pub fn reshape_op<T: MatNumeric>(
    graph: &mut Graph<T>,
    x: NodeId,
    rows: usize,
    cols: usize,
) -> Result<NodeId, MatGradError> {
    let input_value = graph.value_arc(x)?;
    let output = input_value.reshaped(rows, cols)?;

    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if graph.requires_grad(x)? {
        Some(Box::new(ReshapeBackward {
            input_node: x,
            input_shape: input_value.shape(),
        }))
    } else {
        None
    };
    graph.record(output, "reshape", &[x], grad_fn)
}

#[cfg(test)]
#[path = "reshape_test.rs"]
mod tests;

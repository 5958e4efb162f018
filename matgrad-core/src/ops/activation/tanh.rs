use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;

// --- Backward Operation ---

/// `dX = dC ⊙ (1 - y²)` where `y` is the forward output.
#[derive(Debug)]
struct TanhBackward<T: MatNumeric> {
    input_node: NodeId,
    output: Matrix<T>,
}

impl<T: MatNumeric> BackwardOp<T> for TanhBackward<T> {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let grad_input = grad_output.zip_map(&self.output, |g, y| g * (T::one() - y * y))?;
        Ok(vec![Some(grad_input)])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input_node]
    }
}

// --- Forward Operation ---

/// Hyperbolic tangent, element-wise.
pub fn tanh_op<T: MatNumeric>(graph: &mut Graph<T>, x: NodeId) -> Result<NodeId, MatGradError> {
    let output = graph.value(x)?.map(|v| v.tanh());

    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if graph.requires_grad(x)? {
        Some(Box::new(TanhBackward {
            input_node: x,
            output: output.clone(),
        }))
    } else {
        None
    };
    graph.record(output, "tanh", &[x], grad_fn)
}

#[cfg(test)]
#[path = "tanh_test.rs"]
mod tests;

// matgrad-core/src/ops/math_elem/exp.rs

use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;

/// `dX = dC ⊙ exp(x)`, reusing the forward output.
#[derive(Debug)]
struct ExpBackward<T: MatNumeric> {
    input_node: NodeId,
    output: Matrix<T>,
}

impl<T: MatNumeric> BackwardOp<T> for ExpBackward<T> {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        Ok(vec![Some(grad_output.zip_map(&self.output, |g, y| g * y)?)])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input_node]
    }
}

/// Natural exponential, element-wise.
pub fn exp_op<T: MatNumeric>(graph: &mut Graph<T>, x: NodeId) -> Result<NodeId, MatGradError> {
    let output = graph.value(x)?.map(|v| v.exp());

    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if graph.requires_grad(x)? {
        Some(Box::new(ExpBackward {
            input_node: x,
            output: output.clone(),
        }))
    } else {
        None
    };
    graph.record(output, "exp", &[x], grad_fn)
}

#[cfg(test)]
#[path = "exp_test.rs"]
mod tests;

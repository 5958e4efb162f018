// matgrad-core/src/ops/arithmetic/mul.rs

use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::broadcast_utils::{broadcast_shapes, expand, reduce_gradient};
use crate::ops::traits::MatNumeric;
use std::sync::Arc;

// --- Backward Operation ---

/// Backward pass for `C = A ⊙ B`: `dA = dC ⊙ B`, `dB = dC ⊙ A`, each reduced
/// back to its operand's shape when it was broadcast.
#[derive(Debug)]
struct MulBackward<T: MatNumeric> {
    a_node: NodeId,
    b_node: NodeId,
    a_value: Arc<Matrix<T>>,
    b_value: Arc<Matrix<T>>,
    a_requires_grad: bool,
    b_requires_grad: bool,
}

impl<T: MatNumeric> BackwardOp<T> for MulBackward<T> {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let out_shape = grad_output.shape();
        let grad_a = if self.a_requires_grad {
            let b = expand(&self.b_value, out_shape)?;
            let full = grad_output.zip_map(&b, |g, b| g * b)?;
            Some(reduce_gradient(&full, self.a_value.shape())?)
        } else {
            None
        };
        let grad_b = if self.b_requires_grad {
            let a = expand(&self.a_value, out_shape)?;
            let full = grad_output.zip_map(&a, |g, a| g * a)?;
            Some(reduce_gradient(&full, self.b_value.shape())?)
        } else {
            None
        };
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.a_node, self.b_node]
    }
}

// --- Forward Operation ---

/// Element-wise product `A ⊙ B`, broadcasting singleton dimensions the same
/// way as [`add_op`](super::add_op). Two `1 x 1` operands give a scalar product.
///
/// # Errors
/// `MatGradError::BroadcastError` when a dimension differs and neither side is 1.
pub fn mul_op<T: MatNumeric>(graph: &mut Graph<T>, a: NodeId, b: NodeId) -> Result<NodeId, MatGradError> {
    let a_value = graph.value_arc(a)?;
    let b_value = graph.value_arc(b)?;
    let shape = broadcast_shapes(a_value.shape(), b_value.shape())?;
    let output = expand(&a_value, shape)?.zip_map(&expand(&b_value, shape)?, |x, y| x * y)?;

    let a_requires_grad = graph.requires_grad(a)?;
    let b_requires_grad = graph.requires_grad(b)?;
    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if a_requires_grad || b_requires_grad {
        Some(Box::new(MulBackward {
            a_node: a,
            b_node: b,
            a_value,
            b_value,
            a_requires_grad,
            b_requires_grad,
        }))
    } else {
        None
    };
    graph.record(output, "mul", &[a, b], grad_fn)
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;

// matgrad-core/src/ops/arithmetic/add.rs

use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::broadcast_utils::{broadcast_shapes, reduce_gradient};
use crate::ops::traits::MatNumeric;

// --- Backward Operation ---

/// Backward pass for `C = A + B`.
///
/// The upstream gradient flows to both operands unchanged, summed over any
/// dimension the operand was broadcast along.
#[derive(Debug)]
struct AddBackward {
    a_node: NodeId,
    b_node: NodeId,
    a_shape: (usize, usize),
    b_shape: (usize, usize),
    a_requires_grad: bool,
    b_requires_grad: bool,
}

impl<T: MatNumeric> BackwardOp<T> for AddBackward {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let grad_a = if self.a_requires_grad {
            Some(reduce_gradient(grad_output, self.a_shape)?)
        } else {
            None
        };
        let grad_b = if self.b_requires_grad {
            Some(reduce_gradient(grad_output, self.b_shape)?)
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

/// Element-wise `A + B` with 2-D broadcasting of singleton dimensions, e.g. a
/// bias `[n, 1]` added to a batch `[n, k]`.
///
/// # Errors
/// `MatGradError::BroadcastError` when a dimension differs and neither side is 1.
pub fn add_op<T: MatNumeric>(graph: &mut Graph<T>, a: NodeId, b: NodeId) -> Result<NodeId, MatGradError> {
    let a_value = graph.value_arc(a)?;
    let b_value = graph.value_arc(b)?;
    let a_shape = a_value.shape();
    let b_shape = b_value.shape();
    let (rows, cols) = broadcast_shapes(a_shape, b_shape)?;

    let pick = |dim: usize, i: usize| if dim == 1 { 0 } else { i };
    let output = Matrix::from_fn(rows, cols, |r, c| {
        a_value[(pick(a_shape.0, r), pick(a_shape.1, c))] + b_value[(pick(b_shape.0, r), pick(b_shape.1, c))]
    });

    let a_requires_grad = graph.requires_grad(a)?;
    let b_requires_grad = graph.requires_grad(b)?;
    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if a_requires_grad || b_requires_grad {
        Some(Box::new(AddBackward {
            a_node: a,
            b_node: b,
            a_shape,
            b_shape,
            a_requires_grad,
            b_requires_grad,
        }))
    } else {
        None
    };
    graph.record(output, "add", &[a, b], grad_fn)
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;

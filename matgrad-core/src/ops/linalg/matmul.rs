// matgrad-core/src/ops/linalg/matmul.rs

use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use std::sync::Arc;

// --- Backward Operation ---

/// Backward pass for `C = A · B`.
///
/// `dA = dC · Bᵗ`, `dB = Aᵗ · dC`. Both forward operands are kept as shared
/// snapshots.
#[derive(Debug)]
struct MatmulBackward<T: MatNumeric> {
    a_node: NodeId,
    b_node: NodeId,
    a_value: Arc<Matrix<T>>,
    b_value: Arc<Matrix<T>>,
    a_requires_grad: bool,
    b_requires_grad: bool,
}

impl<T: MatNumeric> BackwardOp<T> for MatmulBackward<T> {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let grad_a = if self.a_requires_grad {
            Some(grad_output.matmul(&self.b_value.transpose())?)
        } else {
            None
        };
        let grad_b = if self.b_requires_grad {
            Some(self.a_value.transpose().matmul(grad_output)?)
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

/// Matrix product `A · B` of shapes `[m, k]` and `[k, n]`, giving `[m, n]`.
///
/// # Errors
/// `MatGradError::IncompatibleShapes` when the inner dimensions differ. The
/// check runs before anything is allocated.
pub fn matmul_op<T: MatNumeric>(
    graph: &mut Graph<T>,
    a: NodeId,
    b: NodeId,
) -> Result<NodeId, MatGradError> {
    let a_value = graph.value_arc(a)?;
    let b_value = graph.value_arc(b)?;
    let output = a_value.matmul(&b_value)?;

    let a_requires_grad = graph.requires_grad(a)?;
    let b_requires_grad = graph.requires_grad(b)?;
    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if a_requires_grad || b_requires_grad {
        Some(Box::new(MatmulBackward {
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
    graph.record(output, "matmul", &[a, b], grad_fn)
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;

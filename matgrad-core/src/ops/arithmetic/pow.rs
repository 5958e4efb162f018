use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use std::sync::Arc;

// --- Backward Operation ---

/// `dX = dC ⊙ n · x^(n-1)`. The exponent is a constant and gets no gradient.
#[derive(Debug)]
struct PowBackward<T: MatNumeric> {
    base_node: NodeId,
    base_value: Arc<Matrix<T>>,
    exponent: T,
}

impl<T: MatNumeric> BackwardOp<T> for PowBackward<T> {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let n = self.exponent;
        let grad_base = grad_output.zip_map(&self.base_value, |g, x| g * n * x.powf(n - T::one()))?;
        Ok(vec![Some(grad_base)])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.base_node]
    }
}

// --- Forward Operation ---

/// Raises every element of `base` to the scalar power `exponent`.
///
/// Non-integer exponents of negative elements follow `powf` and yield NaN.
pub fn pow_op<T: MatNumeric>(graph: &mut Graph<T>, base: NodeId, exponent: T) -> Result<NodeId, MatGradError> {
    let base_value = graph.value_arc(base)?;
    let output = base_value.map(|x| x.powf(exponent));

    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if graph.requires_grad(base)? {
        Some(Box::new(PowBackward {
            base_node: base,
            base_value,
            exponent,
        }))
    } else {
        None
    };
    graph.record(output, "pow", &[base], grad_fn)
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;

use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;

// --- Backward Operation ---

/// Per column `i`: `dX[:, i] = dC[:, i] - softmax[:, i] * sum(dC[:, i])`.
#[derive(Debug)]
struct LogSoftmaxBackward<T: MatNumeric> {
    input_node: NodeId,
    softmax: Matrix<T>,
}

impl<T: MatNumeric> BackwardOp<T> for LogSoftmaxBackward<T> {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        if grad_output.shape() != self.softmax.shape() {
            return Err(MatGradError::ShapeMismatch {
                expected: self.softmax.shape(),
                actual: grad_output.shape(),
                operation: "log_softmax backward".to_string(),
            });
        }
        let column_sums = grad_output.sum_rows();
        let grad_input = Matrix::from_fn(grad_output.rows(), grad_output.cols(), |r, c| {
            grad_output[(r, c)] - self.softmax[(r, c)] * column_sums[(0, c)]
        });
        Ok(vec![Some(grad_input)])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input_node]
    }
}

// --- Forward Operation ---

/// Log-softmax over each column, treating every column as one sample's
/// logits.
///
/// The column maximum is subtracted before exponentiating so large logits do
/// not overflow.
pub fn log_softmax_op<T: MatNumeric>(graph: &mut Graph<T>, x: NodeId) -> Result<NodeId, MatGradError> {
    let input_value = graph.value_arc(x)?;
    let (rows, cols) = input_value.shape();

    let mut output = Matrix::zeros(rows, cols);
    for c in 0..cols {
        let max = (0..rows).fold(T::neg_infinity(), |m, r| m.max(input_value[(r, c)]));
        let sum_exp = (0..rows).fold(T::zero(), |acc, r| acc + (input_value[(r, c)] - max).exp());
        let log_sum = sum_exp.ln();
        for r in 0..rows {
            output[(r, c)] = input_value[(r, c)] - max - log_sum;
        }
    }

    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if graph.requires_grad(x)? {
        Some(Box::new(LogSoftmaxBackward {
            input_node: x,
            softmax: output.map(|v| v.exp()),
        }))
    } else {
        None
    };
    graph.record(output, "log_softmax", &[x], grad_fn)
}

#[cfg(test)]
#[path = "log_softmax_test.rs"]
mod tests;

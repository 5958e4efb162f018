use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;

/// `dP[target[i], i] = -dC / batch_size`, zero elsewhere.
#[derive(Debug)]
struct NllLossBackward {
    input_node: NodeId,
    input_shape: (usize, usize),
    targets: Vec<usize>,
}

impl<T: MatNumeric> BackwardOp<T> for NllLossBackward {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let upstream = grad_output.get(0, 0).ok_or_else(|| MatGradError::BackwardNonScalar {
            shape: grad_output.shape(),
        })?;
        let value = -upstream / T::from_usize(self.targets.len());
        let mut grad_input = Matrix::zeros(self.input_shape.0, self.input_shape.1);
        for (sample, &class) in self.targets.iter().enumerate() {
            grad_input[(class, sample)] = value;
        }
        Ok(vec![Some(grad_input)])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input_node]
    }
}

/// Negative log-likelihood averaged over samples.
///
/// `log_probs` is `[classes, batch]` with one column per sample, typically
/// the output of `log_softmax`. `targets[i]` is the class index of column `i`.
///
/// # Errors
/// * `MatGradError::ShapeMismatch` if `targets.len()` differs from the column count.
/// * `MatGradError::EmptyInput` for an empty batch.
/// * `MatGradError::IndexOutOfBounds` if a target is not a valid row.
pub fn nll_loss_op<T: MatNumeric>(
    graph: &mut Graph<T>,
    log_probs: NodeId,
    targets: &[usize],
) -> Result<NodeId, MatGradError> {
    let input_value = graph.value_arc(log_probs)?;
    let (classes, batch_size) = input_value.shape();
    if targets.len() != batch_size {
        return Err(MatGradError::ShapeMismatch {
            expected: (1, batch_size),
            actual: (1, targets.len()),
            operation: "nll_loss".to_string(),
        });
    }
    if batch_size == 0 {
        return Err(MatGradError::EmptyInput {
            operation: "nll_loss".to_string(),
        });
    }
    if let Some(&bad) = targets.iter().find(|&&t| t >= classes) {
        return Err(MatGradError::IndexOutOfBounds {
            index: bad,
            bound: classes,
            operation: "nll_loss".to_string(),
        });
    }

    let picked = targets
        .iter()
        .enumerate()
        .fold(T::zero(), |acc, (sample, &class)| acc + input_value[(class, sample)]);
    let loss = -picked / T::from_usize(batch_size);

    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if graph.requires_grad(log_probs)? {
        Some(Box::new(NllLossBackward {
            input_node: log_probs,
            input_shape: (classes, batch_size),
            targets: targets.to_vec(),
        }))
    } else {
        None
    };
    graph.record(Matrix::scalar(loss), "nll_loss", &[log_probs], grad_fn)
}

#[cfg(test)]
#[path = "nll_test.rs"]
mod tests;

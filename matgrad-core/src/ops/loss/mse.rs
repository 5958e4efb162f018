use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;

/// `dP = 2 (P - T) dC / batch_size`, `dT = -dP`.
#[derive(Debug)]
struct MseLossBackward<T: MatNumeric> {
    prediction_node: NodeId,
    target_node: NodeId,
    diff: Matrix<T>,
    batch_size: usize,
    prediction_requires_grad: bool,
    target_requires_grad: bool,
}

impl<T: MatNumeric> BackwardOp<T> for MseLossBackward<T> {
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError> {
        let upstream = grad_output.get(0, 0).ok_or_else(|| MatGradError::BackwardNonScalar {
            shape: grad_output.shape(),
        })?;
        let two = T::one() + T::one();
        let factor = two * upstream / T::from_usize(self.batch_size);
        let grad_prediction = self.diff.scale(factor);
        let grad_target = if self.target_requires_grad {
            Some(grad_prediction.map(|g| -g))
        } else {
            None
        };
        let grad_prediction = if self.prediction_requires_grad {
            Some(grad_prediction)
        } else {
            None
        };
        Ok(vec![grad_prediction, grad_target])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.prediction_node, self.target_node]
    }
}

/// Squared error summed over every element and averaged over the batch,
/// `sum((P - T)²) / batch_size`.
///
/// Samples are columns, so `batch_size` is the column count. For a `[1, batch]`
/// prediction this is the plain mean.
///
/// # Errors
/// * `MatGradError::ShapeMismatch` if the operands differ in shape.
/// * `MatGradError::EmptyInput` if they hold no elements.
pub fn mse_loss_op<T: MatNumeric>(
    graph: &mut Graph<T>,
    prediction: NodeId,
    target: NodeId,
) -> Result<NodeId, MatGradError> {
    let prediction_value = graph.value_arc(prediction)?;
    let target_value = graph.value_arc(target)?;
    if prediction_value.shape() != target_value.shape() {
        return Err(MatGradError::ShapeMismatch {
            expected: prediction_value.shape(),
            actual: target_value.shape(),
            operation: "mse_loss".to_string(),
        });
    }
    if prediction_value.numel() == 0 {
        return Err(MatGradError::EmptyInput {
            operation: "mse_loss".to_string(),
        });
    }

    let batch_size = prediction_value.cols();
    let diff = prediction_value.zip_map(&target_value, |p, t| p - t)?;
    let loss = diff.as_slice().iter().fold(T::zero(), |acc, &d| acc + d * d) / T::from_usize(batch_size);

    let prediction_requires_grad = graph.requires_grad(prediction)?;
    let target_requires_grad = graph.requires_grad(target)?;
    let grad_fn: Option<Box<dyn BackwardOp<T>>> = if prediction_requires_grad || target_requires_grad {
        Some(Box::new(MseLossBackward {
            prediction_node: prediction,
            target_node: target,
            diff,
            batch_size,
            prediction_requires_grad,
            target_requires_grad,
        }))
    } else {
        None
    };
    graph.record(Matrix::scalar(loss), "mse_loss", &[prediction, target], grad_fn)
}

#[cfg(test)]
#[path = "mse_test.rs"]
mod tests;

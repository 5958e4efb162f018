use super::{Graph, NodeId};
use crate::error::MatGradError;
use crate::ops;
use crate::ops::traits::MatNumeric;

// Method-call forms of the op library, delegating to the `*_op` functions.
impl<T: MatNumeric> Graph<T> {
    pub fn matmul(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, MatGradError> {
        ops::linalg::matmul_op(self, a, b)
    }

    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, MatGradError> {
        ops::arithmetic::add_op(self, a, b)
    }

    pub fn mul(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, MatGradError> {
        ops::arithmetic::mul_op(self, a, b)
    }

    pub fn pow(&mut self, base: NodeId, exponent: T) -> Result<NodeId, MatGradError> {
        ops::arithmetic::pow_op(self, base, exponent)
    }

    pub fn tanh(&mut self, x: NodeId) -> Result<NodeId, MatGradError> {
        ops::activation::tanh_op(self, x)
    }

    pub fn exp(&mut self, x: NodeId) -> Result<NodeId, MatGradError> {
        ops::math_elem::exp_op(self, x)
    }

    pub fn relu(&mut self, x: NodeId) -> Result<NodeId, MatGradError> {
        ops::activation::relu_op(self, x)
    }

    pub fn log_softmax(&mut self, x: NodeId) -> Result<NodeId, MatGradError> {
        ops::activation::log_softmax_op(self, x)
    }

    pub fn mse_loss(&mut self, prediction: NodeId, target: NodeId) -> Result<NodeId, MatGradError> {
        ops::loss::mse_loss_op(self, prediction, target)
    }

    pub fn nll_loss(&mut self, log_probs: NodeId, targets: &[usize]) -> Result<NodeId, MatGradError> {
        ops::loss::nll_loss_op(self, log_probs, targets)
    }

    pub fn reshape(&mut self, x: NodeId, rows: usize, cols: usize) -> Result<NodeId, MatGradError> {
        ops::view::reshape_op(self, x, rows, cols)
    }
}

use crate::error::MatGradError;
use crate::graph::NodeId;
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use std::fmt::Debug;

/// Deferred backward rule attached to a node produced by a differentiable op.
///
/// An implementation stores an immutable snapshot of whatever forward-time
/// values it needs (shared `Arc<Matrix>` handles or owned copies), never a
/// live reference into the graph.
pub trait BackwardOp<T: MatNumeric>: Debug + Send + Sync {
    /// Computes the contribution of `grad_output` (dL/dOutput) to each input.
    ///
    /// The returned vector is aligned with [`BackwardOp::inputs`]. An entry is
    /// `None` when the corresponding input does not require gradients. The
    /// engine adds each `Some` entry into the input's gradient buffer, so an
    /// input that appears twice receives the sum of both entries.
    fn backward(&self, grad_output: &Matrix<T>) -> Result<Vec<Option<Matrix<T>>>, MatGradError>;

    /// Operand handles in forward order, duplicates included.
    fn inputs(&self) -> Vec<NodeId>;
}

use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::ops::traits::MatNumeric;
use std::fmt::Debug;

/// The base trait for all neural network modules (layers, containers).
///
/// Modules do not own their parameters' storage: each parameter is a tracked
/// leaf of the graph the module was built on, referenced by its handle.
pub trait Module<T: MatNumeric>: Debug + Send + Sync {
    /// Records the forward computation for `input` and returns its output node.
    fn forward(&self, graph: &mut Graph<T>, input: NodeId) -> Result<NodeId, MatGradError>;

    /// Handles of every learnable parameter, including those of sub-modules.
    fn parameters(&self) -> Vec<NodeId>;

    /// Pairs each parameter with its graph label.
    fn named_parameters(&self, graph: &Graph<T>) -> Result<Vec<(String, NodeId)>, MatGradError> {
        self.parameters()
            .into_iter()
            .map(|id| Ok((graph.label(id)?.to_string(), id)))
            .collect()
    }

    /// Resets the gradient of every parameter to zero.
    fn zero_grad(&self, graph: &mut Graph<T>) -> Result<(), MatGradError> {
        graph.zero_grads(&self.parameters())
    }
}

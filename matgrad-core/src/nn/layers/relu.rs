use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::nn::module::Module;
use crate::ops::traits::MatNumeric;

/// Layer that applies the Rectified Linear Unit (ReLU) activation function.
///
/// This layer does not have any learnable parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReLU;

impl ReLU {
    pub fn new() -> Self {
        ReLU
    }
}

impl<T: MatNumeric> Module<T> for ReLU {
    fn forward(&self, graph: &mut Graph<T>, input: NodeId) -> Result<NodeId, MatGradError> {
        graph.relu(input)
    }

    fn parameters(&self) -> Vec<NodeId> {
        Vec::new()
    }
}

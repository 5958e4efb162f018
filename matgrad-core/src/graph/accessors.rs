use super::{Graph, Node, NodeId};
use crate::error::MatGradError;
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use std::sync::Arc;

// Read-only shortcuts over `Graph::node`, plus the leaf update path used by
// optimizers.
impl<T: MatNumeric> Graph<T> {
    pub fn value(&self, id: NodeId) -> Result<&Matrix<T>, MatGradError> {
        Ok(self.node(id)?.value())
    }

    pub fn gradient(&self, id: NodeId) -> Result<Option<&Matrix<T>>, MatGradError> {
        Ok(self.node(id)?.gradient())
    }

    pub fn shape(&self, id: NodeId) -> Result<(usize, usize), MatGradError> {
        Ok(self.node(id)?.shape())
    }

    pub fn op_tag(&self, id: NodeId) -> Result<&str, MatGradError> {
        Ok(self.node(id)?.op_tag())
    }

    pub fn parents(&self, id: NodeId) -> Result<&[NodeId], MatGradError> {
        Ok(self.node(id)?.parents())
    }

    pub fn requires_grad(&self, id: NodeId) -> Result<bool, MatGradError> {
        Ok(self.node(id)?.requires_grad())
    }

    pub fn label(&self, id: NodeId) -> Result<&str, MatGradError> {
        Ok(self.node(id)?.label())
    }

    /// Value of a `1 x 1` node.
    pub fn item(&self, id: NodeId) -> Result<T, MatGradError> {
        let value = self.value(id)?;
        if !value.is_scalar() {
            return Err(MatGradError::ShapeMismatch {
                expected: (1, 1),
                actual: value.shape(),
                operation: "item".to_string(),
            });
        }
        Ok(value.as_slice()[0])
    }

    /// Renames a node. Labels are purely diagnostic.
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<(), MatGradError> {
        self.node_mut(id)?.label = label.into();
        Ok(())
    }

    /// Live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    /// Mutable access to the value of a leaf node.
    ///
    /// Backward rules that captured the old value keep their own copy
    /// (copy-on-write through the shared `Arc`).
    ///
    /// # Errors
    /// `MatGradError::NonLeafMutation` when `id` was produced by an op.
    pub fn leaf_value_mut(&mut self, id: NodeId) -> Result<&mut Matrix<T>, MatGradError> {
        let node = self.node_mut(id)?;
        if !node.is_leaf() {
            return Err(MatGradError::NonLeafMutation(id));
        }
        Ok(Arc::make_mut(&mut node.value))
    }
}

use crate::autograd::BackwardOp;
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use std::fmt;
use std::sync::Arc;

/// Stable handle to a node inside a [`Graph`](super::Graph).
///
/// Handles are cheap to copy. A handle stays valid until the graph is
/// released back past the node it names; after that every lookup fails with
/// `MatGradError::StaleNode`, even if the slot has been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: u64,
    pub(crate) generation: u32,
    pub(crate) index: usize,
}

impl NodeId {
    /// Position of the node in its graph's arena (creation order).
    pub fn index(&self) -> usize {
        self.index
    }
}

/// One vertex of the computation graph.
///
/// `value` is shared with the backward rules that snapshot it, so it is kept
/// behind an `Arc` and never mutated through the graph once recorded.
pub struct Node<T: MatNumeric> {
    pub(crate) id: NodeId,
    pub(crate) value: Arc<Matrix<T>>,
    pub(crate) grad: Option<Matrix<T>>,
    pub(crate) requires_grad: bool,
    pub(crate) op_tag: &'static str,
    pub(crate) parents: Vec<NodeId>,
    pub(crate) grad_fn: Option<Box<dyn BackwardOp<T>>>,
    pub(crate) label: String,
}

impl<T: MatNumeric> Node<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &Matrix<T> {
        &self.value
    }

    /// Gradient buffer; `None` when the node does not require gradients.
    pub fn gradient(&self) -> Option<&Matrix<T>> {
        self.grad.as_ref()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.value.shape()
    }

    /// Name of the producing operation, empty for leaves.
    pub fn op_tag(&self) -> &str {
        self.op_tag
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_leaf(&self) -> bool {
        self.op_tag.is_empty()
    }

    pub fn has_backward_rule(&self) -> bool {
        self.grad_fn.is_some()
    }
}

impl<T: MatNumeric> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.index)
            .field("label", &self.label)
            .field("op", &self.op_tag)
            .field("shape", &self.value.shape())
            .field("requires_grad", &self.requires_grad)
            .field("parents", &self.parents.iter().map(|p| p.index).collect::<Vec<_>>())
            .finish()
    }
}

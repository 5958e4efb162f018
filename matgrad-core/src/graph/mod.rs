// src/graph/mod.rs

use crate::autograd::BackwardOp;
use crate::error::MatGradError;
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

mod accessors;
mod autograd_methods;
mod node;
mod op_methods;

pub use node::{Node, NodeId};

/// Global counter so handles from one graph are rejected by another.
static GRAPH_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Arena owning every node of a dynamic computation graph.
///
/// Nodes are appended in creation order and addressed by [`NodeId`] handles.
/// An op can only reference nodes that already exist, so parent edges always
/// point from a newer node to an older one and the graph is acyclic by
/// construction.
///
/// Intermediate nodes built during a training step are dropped with
/// [`Graph::release`]; parameters created before the matching
/// [`Graph::checkpoint`] survive.
pub struct Graph<T: MatNumeric> {
    pub(crate) uid: u64,
    pub(crate) generation: u32,
    pub(crate) nodes: Vec<Node<T>>,
}

/// Watermark returned by [`Graph::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    graph: u64,
    len: usize,
}

impl<T: MatNumeric> Graph<T> {
    pub fn new() -> Self {
        Graph {
            uid: GRAPH_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            nodes: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn next_id(&self) -> NodeId {
        NodeId {
            graph: self.uid,
            generation: self.generation,
            index: self.nodes.len(),
        }
    }

    /// Creates a leaf node. The gradient buffer is allocated (zero-filled)
    /// only when `requires_grad` is set.
    pub fn leaf(&mut self, value: Matrix<T>, requires_grad: bool, label: impl Into<String>) -> NodeId {
        let id = self.next_id();
        let grad = requires_grad.then(|| Matrix::zeros(value.rows(), value.cols()));
        self.nodes.push(Node {
            id,
            value: Arc::new(value),
            grad,
            requires_grad,
            op_tag: "",
            parents: Vec::new(),
            grad_fn: None,
            label: label.into(),
        });
        id
    }

    /// Untracked, unlabeled leaf (inputs, targets, constants).
    pub fn tensor(&mut self, value: Matrix<T>) -> NodeId {
        self.leaf(value, false, "")
    }

    /// Tracked leaf, the usual shape of a learnable parameter.
    pub fn parameter(&mut self, value: Matrix<T>, label: impl Into<String>) -> NodeId {
        self.leaf(value, true, label)
    }

    pub fn scalar(&mut self, value: T, requires_grad: bool) -> NodeId {
        self.leaf(Matrix::scalar(value), requires_grad, "")
    }

    /// Resolves a handle, rejecting handles of other graphs and released nodes.
    pub fn node(&self, id: NodeId) -> Result<&Node<T>, MatGradError> {
        match self.nodes.get(id.index) {
            Some(node) if node.id == id => Ok(node),
            _ => Err(MatGradError::StaleNode(id)),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, MatGradError> {
        match self.nodes.get_mut(id.index) {
            Some(node) if node.id == id => Ok(node),
            _ => Err(MatGradError::StaleNode(id)),
        }
    }

    /// True if any of `ids` requires gradients. Validates every handle.
    pub(crate) fn any_requires_grad(&self, ids: &[NodeId]) -> Result<bool, MatGradError> {
        let mut any = false;
        for &id in ids {
            any |= self.node(id)?.requires_grad;
        }
        Ok(any)
    }

    /// Shared handle on a node value, used by backward rules as their snapshot.
    pub(crate) fn value_arc(&self, id: NodeId) -> Result<Arc<Matrix<T>>, MatGradError> {
        Ok(Arc::clone(&self.node(id)?.value))
    }

    /// Appends the result of an op.
    ///
    /// `requires_grad` is the OR of the operands' flags. Parents are the
    /// operands with duplicates removed, so `x + x` records a single edge.
    /// `grad_fn` is attached only when the result requires gradients.
    pub(crate) fn record(
        &mut self,
        value: Matrix<T>,
        op_tag: &'static str,
        inputs: &[NodeId],
        grad_fn: Option<Box<dyn BackwardOp<T>>>,
    ) -> Result<NodeId, MatGradError> {
        let requires_grad = self.any_requires_grad(inputs)?;
        let mut parents: Vec<NodeId> = Vec::with_capacity(inputs.len());
        for &input in inputs {
            if !parents.contains(&input) {
                parents.push(input);
            }
        }
        let id = self.next_id();
        let grad = requires_grad.then(|| Matrix::zeros(value.rows(), value.cols()));
        self.nodes.push(Node {
            id,
            value: Arc::new(value),
            grad,
            requires_grad,
            op_tag,
            parents,
            grad_fn: if requires_grad { grad_fn } else { None },
            label: String::new(),
        });
        Ok(id)
    }

    /// Marks the current end of the arena.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            graph: self.uid,
            len: self.nodes.len(),
        }
    }

    /// Drops every node created after `checkpoint`.
    ///
    /// Handles to the dropped nodes become stale. Nodes that existed at the
    /// checkpoint, and their gradients, are untouched.
    pub fn release(&mut self, checkpoint: Checkpoint) -> Result<(), MatGradError> {
        if checkpoint.graph != self.uid {
            return Err(MatGradError::InternalError(
                "checkpoint belongs to a different graph".to_string(),
            ));
        }
        if checkpoint.len < self.nodes.len() {
            debug!(
                "Graph::release: dropping {} nodes (keeping {})",
                self.nodes.len() - checkpoint.len,
                checkpoint.len
            );
            self.nodes.truncate(checkpoint.len);
            self.generation = self.generation.wrapping_add(1);
        }
        Ok(())
    }
}

impl<T: MatNumeric> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MatNumeric> std::fmt::Debug for Graph<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("uid", &self.uid)
            .field("generation", &self.generation)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;

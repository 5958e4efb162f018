use super::{Graph, NodeId};
use crate::autograd::topo::topological_sort;
use crate::error::MatGradError;
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use log::{debug, trace, warn};

impl<T: MatNumeric> Graph<T> {
    /// Performs the backward pass starting from `root`.
    ///
    /// Seeds `root`'s gradient with `1`, then invokes every backward rule
    /// reachable from `root` exactly once, in reverse topological order, adding
    /// each contribution into the parents' gradient buffers. Gradients
    /// accumulate across calls; use [`Graph::zero_grad`] between steps.
    ///
    /// # Errors
    /// * `MatGradError::BackwardNonScalar` if `root` is not `1 x 1`. Nothing is
    ///   mutated in that case.
    /// * `MatGradError::StaleNode` if `root` is not a live node of this graph.
    pub fn backward(&mut self, root: NodeId) -> Result<(), MatGradError> {
        let root_node = self.node(root)?;
        if !root_node.value().is_scalar() {
            return Err(MatGradError::BackwardNonScalar {
                shape: root_node.shape(),
            });
        }
        if !root_node.requires_grad() {
            warn!("backward() called on a node that does not require grad. Nothing to do.");
            return Ok(());
        }

        let order = topological_sort(self, root)?;
        debug!(
            "backward: {} nodes reachable from root {}",
            order.len(),
            root.index()
        );

        if let Some(grad) = self.node_mut(root)?.grad.as_mut() {
            grad.fill(T::one());
        }

        for &id in order.iter().rev() {
            let (inputs, input_grads) = {
                let node = self.node(id)?;
                let grad_fn = match node.grad_fn.as_ref() {
                    Some(grad_fn) => grad_fn,
                    None => continue,
                };
                let grad_output = node.grad.as_ref().ok_or_else(|| {
                    MatGradError::InternalError(format!(
                        "node {} has a backward rule but no gradient buffer",
                        id.index()
                    ))
                })?;
                trace!("backward: running '{}' rule of node {}", node.op_tag(), id.index());
                (grad_fn.inputs(), grad_fn.backward(grad_output)?)
            };

            if inputs.len() != input_grads.len() {
                return Err(MatGradError::InternalError(format!(
                    "backward rule of node {} returned {} gradients for {} inputs",
                    id.index(),
                    input_grads.len(),
                    inputs.len()
                )));
            }

            for (input, grad) in inputs.into_iter().zip(input_grads) {
                if let Some(grad) = grad {
                    self.accumulate_grad(input, &grad)?;
                }
            }
        }
        Ok(())
    }

    /// Adds `grad` into the gradient buffer of `id`; untracked nodes are skipped.
    fn accumulate_grad(&mut self, id: NodeId, grad: &Matrix<T>) -> Result<(), MatGradError> {
        let node = self.node_mut(id)?;
        match node.grad.as_mut() {
            Some(existing) => existing.accumulate(grad),
            None => Ok(()),
        }
    }

    /// Resets the gradient of `id` to zeros. No-op for untracked nodes.
    pub fn zero_grad(&mut self, id: NodeId) -> Result<(), MatGradError> {
        if let Some(grad) = self.node_mut(id)?.grad.as_mut() {
            grad.fill(T::zero());
        }
        Ok(())
    }

    /// [`Graph::zero_grad`] over a parameter list.
    pub fn zero_grads(&mut self, ids: &[NodeId]) -> Result<(), MatGradError> {
        for &id in ids {
            self.zero_grad(id)?;
        }
        Ok(())
    }
}

use matgrad_core::{Graph, MatGradError, MatNumeric, NodeId};
use thiserror::Error;

pub mod sgd;

pub use sgd::Sgd;

/// Error type for optimizer construction and updates.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum OptimError {
    #[error("Learning rate must be finite and positive, got {0}")]
    InvalidLearningRate(f64),

    #[error(transparent)]
    Graph(#[from] MatGradError),
}

/// Trait for optimization algorithms.
///
/// Optimizers do not own parameters: every call receives the graph and the
/// handles of the leaves to update, typically `module.parameters()`.
pub trait Optimizer<T: MatNumeric> {
    /// Performs a single update of `params` from their accumulated gradients.
    fn step(&mut self, graph: &mut Graph<T>, params: &[NodeId]) -> Result<(), OptimError>;

    /// Resets the gradients of `params`. Call before each backward pass,
    /// gradients accumulate otherwise.
    fn zero_grad(&self, graph: &mut Graph<T>, params: &[NodeId]) -> Result<(), OptimError> {
        graph.zero_grads(params)?;
        Ok(())
    }
}

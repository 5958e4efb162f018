use crate::graph::NodeId;
use thiserror::Error;

/// Error type for the matgrad engine.
///
/// Every variant is returned by the operation that detects it, before any
/// node is allocated or any gradient buffer is touched.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum MatGradError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
        operation: String,
    },

    #[error("Incompatible shapes for operation {operation}: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        shape1: (usize, usize),
        shape2: (usize, usize),
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: (usize, usize),
        shape2: (usize, usize),
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: (usize, usize) },

    #[error("Backward called on non-scalar node of shape {shape:?}; a 1x1 root is required")]
    BackwardNonScalar { shape: (usize, usize) },

    #[error("Index out of bounds: index {index} for dimension of size {bound} ({operation})")]
    IndexOutOfBounds {
        index: usize,
        bound: usize,
        operation: String,
    },

    #[error("Operation {operation} requires at least one element")]
    EmptyInput { operation: String },

    #[error("Node {0:?} was released from the graph or belongs to another graph")]
    StaleNode(NodeId),

    #[error("Node {0:?} is produced by an operation; only leaf values can be updated")]
    NonLeafMutation(NodeId),

    #[error("Shape mismatch during gradient accumulation: expected {expected:?}, got {actual:?}")]
    GradientAccumulationShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Parameter initialization failed: {0}")]
    InitializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl MatGradError {
    /// True for the shape family of errors (matmul, add, reshape, loss operands).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            MatGradError::ShapeMismatch { .. }
                | MatGradError::IncompatibleShapes { .. }
                | MatGradError::BroadcastError { .. }
                | MatGradError::TensorCreationError { .. }
        )
    }
}

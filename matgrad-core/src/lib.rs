//! Reverse-mode automatic differentiation over dense 2-D matrices.
//!
//! A [`Graph`] owns every node of a dynamically built computation. Leaves are
//! created with [`Graph::leaf`] (or the `tensor` / `parameter` shortcuts), ops
//! such as [`Graph::matmul`] append new nodes, and [`Graph::backward`]
//! accumulates gradients from a `1 x 1` root into every tracked ancestor.

pub mod autograd;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod nn;
pub mod ops;
pub mod utils;

pub use error::MatGradError;
pub use graph::{Checkpoint, Graph, Node, NodeId};
pub use matrix::Matrix;
pub use ops::traits::MatNumeric;
// Re-export traits required by public bounds
pub use num_traits;

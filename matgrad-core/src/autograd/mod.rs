//! Reverse-mode machinery: the backward rule trait, topological ordering,
//! gradient checking against finite differences and DOT export.
//!
//! The engine entry points themselves (`backward`, `zero_grad`) are methods on
//! [`Graph`](crate::graph::Graph).

pub mod backward_op;
pub mod dot;
pub mod grad_check;
pub(crate) mod topo;

pub use backward_op::BackwardOp;

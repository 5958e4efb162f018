//! # Operation library (`ops`)
//!
//! Every differentiable operation lives in a submodule grouped by kind:
//!
//! - [`linalg`]: matrix product.
//! - [`arithmetic`]: element-wise `add` and `mul` with 2-D broadcasting, and
//!   `pow` by a constant exponent.
//! - [`activation`]: `relu`, `tanh` and column-wise `log_softmax`.
//! - [`math_elem`]: `exp`.
//! - [`loss`]: `mse_loss` and `nll_loss`, both reducing to a `1 x 1` node.
//! - [`view`]: `reshape`.
//!
//! Each op exposes a `xxx_op(graph, ...)` function that validates shapes,
//! computes the forward value, and records the result through
//! `Graph::record` together with its `XxxBackward` rule. Validation always runs
//! first, so a failing op leaves the graph exactly as it was. `Graph` also
//! offers method forms (`graph.matmul(a, b)`) that delegate here.

pub mod activation;
pub mod arithmetic;
pub mod broadcast_utils;
pub mod linalg;
pub mod loss;
pub mod math_elem;
pub mod traits;
pub mod view;

//! Loss functions. Both reduce to a `1 x 1` node suitable as a backward root.

pub mod mse;
pub mod nll;

pub use mse::mse_loss_op;
pub use nll::nll_loss_op;

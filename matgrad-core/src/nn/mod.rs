//! Parameter initialization and the layer building blocks of an MLP.

pub mod init;
pub mod layers;
pub mod module;

pub use layers::{Linear, ReLU, Sequential};
pub use module::Module;

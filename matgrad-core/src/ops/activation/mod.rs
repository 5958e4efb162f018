pub mod log_softmax;
pub mod relu;
pub mod tanh;

pub use log_softmax::log_softmax_op;
pub use relu::relu_op;
pub use tanh::tanh_op;

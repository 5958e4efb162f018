pub mod exp;

pub use exp::exp_op;

pub mod linear;
pub mod relu;
pub mod sequential;

pub use linear::Linear;
pub use relu::ReLU;
pub use sequential::Sequential;

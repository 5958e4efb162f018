pub mod numeric;

pub use numeric::MatNumeric;

use num_traits::{Float, NumAssignOps, NumOps};
use std::fmt::{Debug, Display};

/// Float element types usable in matgrad matrices and ops.
///
/// Strictly reserved for `f32` and `f64`. Beyond what `Float` provides,
/// ops need a lossless path from element counts (batch sizes) and a
/// widening conversion for diagnostics and gradient checking.
pub trait MatNumeric:
    Float
    + NumAssignOps
    + NumOps
    + PartialOrd
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + 'static
{
    /// Converts an element count into the element type.
    fn from_usize(n: usize) -> Self;

    /// Widens to `f64`.
    fn to_f64_lossy(self) -> f64;

    /// Narrows from `f64`.
    fn from_f64_lossy(v: f64) -> Self;
}

impl MatNumeric for f32 {
    fn from_usize(n: usize) -> Self {
        n as f32
    }

    fn to_f64_lossy(self) -> f64 {
        self as f64
    }

    fn from_f64_lossy(v: f64) -> Self {
        v as f32
    }
}

impl MatNumeric for f64 {
    fn from_usize(n: usize) -> Self {
        n as f64
    }

    fn to_f64_lossy(self) -> f64 {
        self
    }

    fn from_f64_lossy(v: f64) -> Self {
        v
    }
}

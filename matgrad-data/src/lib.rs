//! Dataset loading and index sampling for matgrad training loops.
//!
//! [`IdxDataset`] reads the IDX image/label format and hands out batches as
//! `[pixels, batch]` matrices, one column per sample, ready for
//! `Linear::forward`. Samplers decide the order in which samples are visited.

pub mod dataset;
pub mod error;
pub mod idx;
pub mod samplers;

pub use dataset::Dataset;
pub use error::DataError;
pub use idx::IdxDataset;
pub use samplers::{RandomSampler, Sampler, SequentialSampler};

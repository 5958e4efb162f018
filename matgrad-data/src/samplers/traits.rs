use std::fmt::Debug;

/// Decides the order in which dataset indices are visited.
pub trait Sampler: Debug + Send + Sync {
    /// Indices for one pass over a dataset of `dataset_len` items.
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync>;

    /// Number of indices [`Sampler::iter`] yields.
    fn len(&self, dataset_len: usize) -> usize;
}

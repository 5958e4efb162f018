// matgrad-data/src/samplers/random_sampler.rs

use super::traits::Sampler;
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// A sampler that randomly samples indices from a dataset.
///
/// Each call to [`Sampler::iter`] draws a fresh order from the sampler's own
/// generator, so successive epochs differ while a seeded sampler stays
/// reproducible.
#[derive(Debug)]
pub struct RandomSampler {
    replacement: bool,
    num_samples: Option<usize>,
    rng: Mutex<StdRng>,
}

impl RandomSampler {
    /// Creates a sampler seeded from the operating system.
    ///
    /// * `replacement`: if `true`, an index can be selected multiple times.
    /// * `num_samples`: number of indices to draw, the dataset size by default.
    pub fn new(replacement: bool, num_samples: Option<usize>) -> Self {
        Self::with_rng(replacement, num_samples, StdRng::from_entropy())
    }

    /// Creates a reproducible sampler.
    pub fn seeded(replacement: bool, num_samples: Option<usize>, seed: u64) -> Self {
        Self::with_rng(replacement, num_samples, StdRng::seed_from_u64(seed))
    }

    fn with_rng(replacement: bool, num_samples: Option<usize>, rng: StdRng) -> Self {
        RandomSampler {
            replacement,
            num_samples,
            rng: Mutex::new(rng),
        }
    }
}

impl Sampler for RandomSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        if dataset_len == 0 {
            return Box::new(std::iter::empty());
        }
        let num_samples = self.num_samples.unwrap_or(dataset_len);
        // A poisoned lock still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if self.replacement {
            let indices: Vec<usize> = (0..num_samples).map(|_| rng.gen_range(0..dataset_len)).collect();
            return Box::new(indices.into_iter());
        }
        if num_samples > dataset_len {
            warn!(
                "RandomSampler: num_samples ({}) > dataset_len ({}) without replacement. Returning empty iterator.",
                num_samples, dataset_len
            );
            return Box::new(std::iter::empty());
        }
        let mut indices: Vec<usize> = (0..dataset_len).collect();
        indices.shuffle(&mut *rng);
        indices.truncate(num_samples);
        Box::new(indices.into_iter())
    }

    fn len(&self, dataset_len: usize) -> usize {
        let num_samples = self.num_samples.unwrap_or(dataset_len);
        if dataset_len == 0 || (!self.replacement && num_samples > dataset_len) {
            0
        } else {
            num_samples
        }
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;

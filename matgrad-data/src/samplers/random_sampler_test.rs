use super::*;
use std::collections::HashSet;

#[test]
fn test_random_sampler_len() {
    assert_eq!(RandomSampler::new(false, None).len(10), 10);
    assert_eq!(RandomSampler::new(false, Some(5)).len(10), 5);
}

#[test]
fn test_random_sampler_is_a_permutation() {
    let sampler = RandomSampler::seeded(false, None, 1);
    let indices: Vec<usize> = sampler.iter(50).collect();
    assert_eq!(indices.len(), 50);
    let unique: HashSet<usize> = indices.iter().copied().collect();
    assert_eq!(unique.len(), 50);
    assert!(unique.iter().all(|&i| i < 50));
}

#[test]
fn test_random_sampler_subset_without_replacement() {
    let sampler = RandomSampler::seeded(false, Some(5), 2);
    let indices: Vec<usize> = sampler.iter(10).collect();
    assert_eq!(indices.len(), 5);
    assert_eq!(indices.iter().collect::<HashSet<_>>().len(), 5);
}

#[test]
fn test_random_sampler_too_many_without_replacement() {
    let sampler = RandomSampler::seeded(false, Some(20), 3);
    assert_eq!(sampler.iter(10).count(), 0);
    assert_eq!(sampler.len(10), 0);
    // With replacement the same request is satisfiable.
    assert_eq!(RandomSampler::seeded(true, Some(20), 3).len(10), 20);
}

#[test]
fn test_random_sampler_with_replacement() {
    let sampler = RandomSampler::seeded(true, Some(100), 4);
    let indices: Vec<usize> = sampler.iter(3).collect();
    assert_eq!(indices.len(), 100);
    assert!(indices.iter().all(|&i| i < 3));
}

#[test]
fn test_random_sampler_seeded_is_reproducible() {
    let a: Vec<usize> = RandomSampler::seeded(false, None, 42).iter(30).collect();
    let b: Vec<usize> = RandomSampler::seeded(false, None, 42).iter(30).collect();
    assert_eq!(a, b);

    // Consecutive epochs draw different orders.
    let sampler = RandomSampler::seeded(false, None, 42);
    let first: Vec<usize> = sampler.iter(30).collect();
    let second: Vec<usize> = sampler.iter(30).collect();
    assert_eq!(first, a);
    assert_ne!(first, second);
}

#[test]
fn test_random_sampler_empty_dataset() {
    let sampler = RandomSampler::new(true, Some(4));
    assert_eq!(sampler.iter(0).count(), 0);
    assert_eq!(sampler.len(0), 0);
}

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BenchError;

/// Index sequence shared by every benchmark case of a run.
///
/// Generated once and only handed out as a slice, so each case walks the exact
/// same accesses in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    indices: Vec<usize>,
    item_count: usize,
}

impl Workload {
    /// `access_count` indices drawn uniformly from `[0, item_count)`.
    pub fn generate<R: Rng + ?Sized>(
        access_count: usize,
        item_count: usize,
        rng: &mut R,
    ) -> Result<Self, BenchError> {
        if item_count == 0 {
            return Err(BenchError::EmptyDomain);
        }

        let distrib = Uniform::new(0, item_count);
        let mut indices = Vec::with_capacity(access_count);
        indices.extend(distrib.sample_iter(rng).take(access_count));

        Ok(Self {
            indices,
            item_count,
        })
    }

    /// Seeds the generator from OS entropy, so every run sees a new sequence.
    pub fn from_entropy(access_count: usize, item_count: usize) -> Result<Self, BenchError> {
        Self::generate(access_count, item_count, &mut StdRng::from_entropy())
    }

    pub fn from_seed(
        access_count: usize,
        item_count: usize,
        seed: u64,
    ) -> Result<Self, BenchError> {
        Self::generate(access_count, item_count, &mut StdRng::seed_from_u64(seed))
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_domain_is_rejected() {
        assert_eq!(
            Workload::from_seed(10, 0, 1).unwrap_err(),
            BenchError::EmptyDomain
        );
    }

    #[test]
    fn zero_accesses_is_an_empty_workload() {
        let workload = Workload::from_entropy(0, 16).unwrap();
        assert!(workload.is_empty());
        assert_eq!(workload.item_count(), 16);
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = Workload::from_seed(1000, 8096, 42).unwrap();
        let b = Workload::from_seed(1000, 8096, 42).unwrap();
        let c = Workload::from_seed(1000, 8096, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.indices(), c.indices());
    }
}

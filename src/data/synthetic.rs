use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};
use rand_distr::{Distribution, StandardNormal};

use super::{Dataset, SparseVector};
use crate::error::{Error, Result};

/// Which kind of labels to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Real-valued labels `x·w (+ noise)`.
    Regression,
    /// Labels `sign(x·w (+ noise))` in `{-1, 1}`.
    Classification,
}

/// Generates synthetic data which is sparse in each sample.
#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub num_samples: usize,
    pub num_features: usize,
    /// Proportion of features that are non-zero in each sample.
    pub sparsity: f64,
    pub task: Task,
    /// Whether to add standard gaussian noise to the labels.
    pub noisy: bool,
    pub seed: u64,
}

impl SyntheticSpec {
    pub fn new(num_samples: usize, num_features: usize, sparsity: f64) -> Self {
        Self {
            num_samples,
            num_features,
            sparsity,
            task: Task::Regression,
            noisy: true,
            seed: 1000,
        }
    }

    pub fn task(mut self, task: Task) -> Self {
        self.task = task;
        self
    }

    pub fn noisy(mut self, noisy: bool) -> Self {
        self.noisy = noisy;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates the dataset.
    ///
    /// Every sample has exactly `floor(num_features * sparsity)` non-zero features at
    /// random positions, drawn from a standard normal, as is the true coefficient vector.
    ///
    /// # Returns
    /// The dataset together with the true coefficients, or an `InvalidConfig` if
    /// `sparsity` isn't in `[0, 1]`.
    pub fn generate(&self) -> Result<(Dataset, Vec<f64>)> {
        if !(0. ..=1.).contains(&self.sparsity) {
            return Err(Error::InvalidConfig(format!(
                "sparsity must be in [0, 1], got {}",
                self.sparsity
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let nonzero = (self.num_features as f64 * self.sparsity) as usize;

        let coefs: Vec<f64> = (0..self.num_features)
            .map(|_| standard_normal(&mut rng))
            .collect();

        let mut features = Vec::with_capacity(self.num_samples);
        let mut labels = Vec::with_capacity(self.num_samples);

        for _ in 0..self.num_samples {
            let mut positions = index::sample(&mut rng, self.num_features, nonzero).into_vec();
            positions.sort_unstable();

            let x = SparseVector::from_pairs(
                positions
                    .into_iter()
                    .map(|i| (i, standard_normal(&mut rng))),
            );

            let mut y = x.dot(&coefs);
            if self.noisy {
                y += standard_normal(&mut rng);
            }

            if self.task == Task::Classification {
                y = if y < 0. { -1. } else { 1. };
            }

            features.push(x);
            labels.push(y);
        }

        let dataset = Dataset::new(features, labels, self.num_features)?;
        Ok((dataset, coefs))
    }
}

fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sample_has_the_same_sparsity() {
        let (dataset, coefs) = SyntheticSpec::new(20, 10, 0.3).generate().unwrap();

        assert_eq!(coefs.len(), 10);
        assert_eq!(dataset.num_samples(), 20);
        assert!(dataset.iter().all(|(x, _)| x.len() == 3));
    }

    #[test]
    fn noiseless_regression_is_exact() {
        let (dataset, coefs) = SyntheticSpec::new(5, 8, 0.5)
            .noisy(false)
            .generate()
            .unwrap();

        for (x, y) in dataset.iter() {
            assert_eq!(y, x.dot(&coefs));
        }
    }

    #[test]
    fn classification_labels_are_signs() {
        let (dataset, _) = SyntheticSpec::new(50, 8, 0.5)
            .task(Task::Classification)
            .generate()
            .unwrap();

        assert!(dataset.labels().iter().all(|&y| y == 1. || y == -1.));
    }

    #[test]
    fn same_seed_same_data() {
        let spec = SyntheticSpec::new(10, 10, 0.2).seed(7);
        let (a, _) = spec.generate().unwrap();
        let (b, _) = spec.generate().unwrap();

        assert_eq!(a.labels(), b.labels());
    }

    #[test]
    fn invalid_sparsity() {
        assert!(SyntheticSpec::new(1, 1, 1.5).generate().is_err());
    }
}

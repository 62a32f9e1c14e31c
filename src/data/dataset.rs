use rayon::prelude::*;

use super::SparseVector;
use crate::{
    error::{Error, Result},
    problem::Gradient,
};

/// A read-only collection of sparse samples with their labels.
///
/// Every feature index is validated once, on construction. Workers borrow the
/// dataset concurrently for the whole run and never check indices again.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Vec<SparseVector>,
    labels: Vec<f64>,
    num_features: usize,
    max_sparsity: usize,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `features` - One sparse vector per sample.
    /// * `labels` - One label per sample.
    /// * `num_features` - The dimensionality of the samples.
    ///
    /// # Returns
    /// A `DimensionMismatch` if there isn't one label per sample, or a
    /// `FeatureOutOfRange` if any sample references a feature `>= num_features`.
    pub fn new(features: Vec<SparseVector>, labels: Vec<f64>, num_features: usize) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(Error::DimensionMismatch {
                expected: features.len(),
                got: labels.len(),
            });
        }

        for (sample, x) in features.iter().enumerate() {
            if let Some(index) = x.max_index().filter(|&i| i >= num_features) {
                return Err(Error::FeatureOutOfRange {
                    sample,
                    index,
                    num_features,
                });
            }
        }

        let max_sparsity = features.iter().map(SparseVector::len).max().unwrap_or(0);

        Ok(Self {
            features,
            labels,
            num_features,
            max_sparsity,
        })
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// The largest amount of non-zero entries of any single sample.
    pub fn max_sparsity(&self) -> usize {
        self.max_sparsity
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the `i`-th sample and its label.
    ///
    /// # Panics
    /// If `i >= self.num_samples()`.
    #[inline]
    pub fn sample(&self, i: usize) -> (&SparseVector, f64) {
        (&self.features[i], self.labels[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SparseVector, f64)> {
        self.features.iter().zip(self.labels.iter().copied())
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Evaluates the mean loss of the model over every sample, in parallel.
    ///
    /// # Arguments
    /// * `gradient` - The model whose loss to evaluate.
    /// * `weights` - A dense copy of the iterate.
    ///
    /// # Returns
    /// The mean per-sample loss, `0` for an empty dataset.
    pub fn loss<G: Gradient>(&self, gradient: &G, weights: &[f64]) -> f64 {
        if self.is_empty() {
            return 0.;
        }

        let total: f64 = self
            .features
            .par_iter()
            .zip(self.labels.par_iter())
            .map(|(x, &y)| gradient.loss(weights, x, y))
            .sum();

        total / self.num_samples() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LinearRegression;

    #[test]
    fn rejects_missing_labels() {
        let features = vec![SparseVector::new(), SparseVector::new()];
        let err = Dataset::new(features, vec![1.], 1).unwrap_err();

        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_features() {
        let features = vec![
            SparseVector::from_pairs([(0, 1.)]),
            SparseVector::from_pairs([(1, 1.), (4, 1.)]),
        ];
        let err = Dataset::new(features, vec![0., 0.], 4).unwrap_err();

        assert!(matches!(
            err,
            Error::FeatureOutOfRange {
                sample: 1,
                index: 4,
                num_features: 4
            }
        ));
    }

    #[test]
    fn tracks_max_sparsity() {
        let features = vec![
            SparseVector::from_pairs([(0, 1.)]),
            SparseVector::from_pairs([(0, 1.), (1, 1.), (2, 1.)]),
        ];
        let dataset = Dataset::new(features, vec![0., 0.], 3).unwrap();

        assert_eq!(dataset.max_sparsity(), 3);
        assert_eq!(dataset.num_samples(), 2);
    }

    #[test]
    fn mean_squared_loss() {
        let features = vec![
            SparseVector::from_pairs([(0, 1.)]),
            SparseVector::from_pairs([(1, 2.)]),
        ];
        let dataset = Dataset::new(features, vec![1., 0.], 2).unwrap();

        // residuals: (0 - 1) and (2 * 1 - 0)
        let loss = dataset.loss(&LinearRegression, &[0., 1.]);
        assert_eq!(loss, (1. + 4.) / 2.);
    }
}

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::ParamGen;
use crate::error::{Error, Result};

/// Draws starting weights independently from `distribution`.
pub struct RandParamGen<R: Rng, D: Distribution<f64>> {
    rng: R,
    distribution: D,
    remaining: usize,
}

impl<R: Rng, D: Distribution<f64>> RandParamGen<R, D> {
    /// # Arguments
    /// * `rng` - The source of randomness, seed it for reproducible starts.
    /// * `distribution` - What every weight is drawn from.
    /// * `len` - The amount of coordinates.
    pub fn new(rng: R, distribution: D, len: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: len,
        }
    }
}

impl<R: Rng> RandParamGen<R, Uniform<f64>> {
    /// Weights drawn from `[low, high)`.
    ///
    /// # Returns
    /// A `Distribution` error unless `low < high` and both are finite.
    pub fn uniform(rng: R, len: usize, low: f64, high: f64) -> Result<Self> {
        let distribution =
            Uniform::new(low, high).map_err(|e| Error::Distribution(e.to_string()))?;

        Ok(Self::new(rng, distribution, len))
    }
}

impl<R: Rng> RandParamGen<R, Normal<f64>> {
    /// Weights drawn from `N(mean, std_dev²)`.
    ///
    /// # Returns
    /// A `Distribution` error if `std_dev` is negative or not finite.
    pub fn normal(rng: R, len: usize, mean: f64, std_dev: f64) -> Result<Self> {
        let distribution =
            Normal::new(mean, std_dev).map_err(|e| Error::Distribution(e.to_string()))?;

        Ok(Self::new(rng, distribution, len))
    }
}

impl<R: Rng, D: Distribution<f64>> ParamGen for RandParamGen<R, D> {
    fn remaining(&self) -> usize {
        self.remaining
    }

    fn fill(&mut self, out: &mut [f64]) -> usize {
        let n = out.len().min(self.remaining);

        for w in &mut out[..n] {
            *w = self.distribution.sample(&mut self.rng);
        }

        self.remaining -= n;
        n
    }
}

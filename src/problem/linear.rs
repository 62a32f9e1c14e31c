use super::Gradient;
use crate::{data::SparseVector, storage::SharedIterate};

/// Least squares regression, loss `(x·w - y)²`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression;

impl Gradient for LinearRegression {
    #[inline]
    fn gradient(&self, iterate: &SharedIterate, x: &SparseVector, y: f64, out: &mut SparseVector) {
        let scale = 2. * (iterate.dot(x) - y);

        out.clear();
        for e in x {
            out.push(e.index, scale * e.value);
        }
    }

    fn loss(&self, weights: &[f64], x: &SparseVector, y: f64) -> f64 {
        let residual = x.dot(weights) - y;
        residual * residual
    }
}

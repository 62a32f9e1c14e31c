use super::Gradient;
use crate::{data::SparseVector, storage::SharedIterate};

/// Logistic regression over labels in `{-1, 1}`, loss `ln(1 + e^(-y x·w))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticRegression;

#[inline]
fn sigmoid(z: f64) -> f64 {
    1. / (1. + (-z).exp())
}

impl Gradient for LogisticRegression {
    #[inline]
    fn gradient(&self, iterate: &SharedIterate, x: &SparseVector, y: f64, out: &mut SparseVector) {
        let margin = y * iterate.dot(x);
        let scale = -y * sigmoid(-margin);

        out.clear();
        for e in x {
            out.push(e.index, scale * e.value);
        }
    }

    fn loss(&self, weights: &[f64], x: &SparseVector, y: f64) -> f64 {
        let margin = y * x.dot(weights);

        // ln(1 + e^-m) without overflowing for large |m|
        if margin > 0. {
            (-margin).exp().ln_1p()
        } else {
            -margin + margin.exp().ln_1p()
        }
    }
}

use crate::{data::SparseVector, storage::SharedIterate};

/// The loss of a model over a single sample and its sparse gradient.
///
/// Implementors must be pure: the only side effect allowed is writing into the
/// caller supplied scratch buffer.
pub trait Gradient: Sync {
    /// Writes the gradient of the loss at the current iterate for one sample.
    ///
    /// The iterate is read while other threads write it, any mix of old and new
    /// coordinates is a valid input.
    ///
    /// # Arguments
    /// * `iterate` - The shared weights.
    /// * `x` - The sample's features.
    /// * `y` - The sample's label.
    /// * `out` - The scratch buffer, it's cleared before being written.
    fn gradient(&self, iterate: &SharedIterate, x: &SparseVector, y: f64, out: &mut SparseVector);

    /// Evaluates the loss of a dense copy of the weights on one sample.
    fn loss(&self, weights: &[f64], x: &SparseVector, y: f64) -> f64;
}

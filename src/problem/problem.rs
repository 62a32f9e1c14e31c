use super::Gradient;
use crate::error::{Error, Result};

/// The optimization problem of a single run.
///
/// Bundles the model's gradient with the step size and the iteration and logging
/// budgets. The update strategy is chosen separately, as a type parameter of
/// [`Orchestrator::run`](crate::execution::Orchestrator::run), so any pair of
/// gradient and strategy can be composed. It's immutable once the run starts and
/// is passed in explicitly, runs never share it.
#[derive(Debug, Clone)]
pub struct Problem<G: Gradient> {
    gradient: G,
    step_size: f64,
    num_total_iterations: usize,
    num_log_points: usize,
}

impl<G: Gradient> Problem<G> {
    /// Creates a new `Problem`.
    ///
    /// # Arguments
    /// * `gradient` - The model to optimize.
    /// * `step_size` - The coefficient applied to every gradient entry.
    /// * `num_total_iterations` - The total amount of updates across all threads.
    /// * `num_log_points` - The amount of iterate snapshots to record.
    ///
    /// # Returns
    /// An `InvalidConfig` if the step size isn't positive and finite, or there are no log points.
    pub fn new(
        gradient: G,
        step_size: f64,
        num_total_iterations: usize,
        num_log_points: usize,
    ) -> Result<Self> {
        if !(step_size.is_finite() && step_size > 0.) {
            return Err(Error::InvalidConfig(format!(
                "step size must be positive and finite, got {step_size}"
            )));
        }

        if num_log_points == 0 {
            return Err(Error::InvalidConfig(
                "the amount of log points must be positive".into(),
            ));
        }

        Ok(Self {
            gradient,
            step_size,
            num_total_iterations,
            num_log_points,
        })
    }

    #[inline]
    pub fn gradient(&self) -> &G {
        &self.gradient
    }

    #[inline]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn num_total_iterations(&self) -> usize {
        self.num_total_iterations
    }

    pub fn num_log_points(&self) -> usize {
        self.num_log_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LinearRegression;

    #[test]
    fn rejects_bad_step_sizes() {
        for step in [0., -1., f64::NAN, f64::INFINITY] {
            assert!(Problem::new(LinearRegression, step, 10, 1).is_err());
        }
    }

    #[test]
    fn rejects_zero_log_points() {
        assert!(Problem::new(LinearRegression, 0.1, 10, 0).is_err());
    }

    #[test]
    fn zero_iterations_is_valid() {
        let problem = Problem::new(LinearRegression, 0.1, 0, 5).unwrap();
        assert_eq!(problem.num_total_iterations(), 0);
    }
}

use std::num::NonZeroUsize;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{GradientKind, InitSpec, RunConfig, StrategyKind};
use crate::{
    data::Dataset,
    error::{Error, Result},
    execution::{Orchestrator, RunOutcome},
    initialization::{ConstParamGen, RandParamGen},
    problem::{Gradient, LinearRegression, LogisticRegression, Problem},
    storage::SharedIterate,
    strategies::{Hogwild, Independent, Naive, Segmented, Shared, UpdateStrategy},
};

/// Validates `config` and executes the run it describes over `dataset`.
///
/// The gradient and strategy choices are resolved statically, one after the
/// other, so the hot loop is monomorphized for the chosen pair.
///
/// # Returns
/// The run's outcome or an error if encountered.
pub fn run(config: &RunConfig, dataset: &Dataset) -> Result<RunOutcome> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let iterate = start_point(config.init, dataset.num_features(), &mut rng)?;
    let worker_seed = rng.random();

    let runner = Runner {
        config,
        dataset,
        worker_seed,
    };

    runner.resolve_gradient(iterate)
}

/// Builds the starting iterate, drawing random values from `rng` if needed.
fn start_point(init: InitSpec, len: usize, rng: &mut StdRng) -> Result<SharedIterate> {
    match init {
        InitSpec::Const { value } => SharedIterate::from_param_gen(ConstParamGen::new(value, len)),
        InitSpec::Uniform { low, high } => {
            SharedIterate::from_param_gen(RandParamGen::uniform(rng, len, low, high)?)
        }
        InitSpec::Normal { mean, std_dev } => {
            SharedIterate::from_param_gen(RandParamGen::normal(rng, len, mean, std_dev)?)
        }
    }
}

struct Runner<'a> {
    config: &'a RunConfig,
    dataset: &'a Dataset,
    worker_seed: u64,
}

impl Runner<'_> {
    /// Resolves the `Gradient` of this run.
    fn resolve_gradient(&self, iterate: SharedIterate) -> Result<RunOutcome> {
        match self.config.gradient {
            GradientKind::LinearRegression => self.resolve_strategy(LinearRegression, iterate),
            GradientKind::LogisticRegression => self.resolve_strategy(LogisticRegression, iterate),
        }
    }

    /// Resolves the `UpdateStrategy` of this run.
    fn resolve_strategy<G: Gradient>(&self, gradient: G, iterate: SharedIterate) -> Result<RunOutcome> {
        let problem = Problem::new(
            gradient,
            self.config.step_size,
            self.config.iterations,
            self.config.log_points,
        )?;

        match self.config.strategy {
            StrategyKind::Hogwild => self.execute::<G, Hogwild>(&problem, iterate),
            StrategyKind::Naive => self.execute::<G, Naive>(&problem, iterate),
            StrategyKind::Segmented => self.execute::<G, Segmented>(&problem, iterate),
            StrategyKind::Independent => self.execute::<G, Independent>(&problem, iterate),
            StrategyKind::Shared => self.execute::<G, Shared>(&problem, iterate),
        }
    }

    fn execute<G, S>(&self, problem: &Problem<G>, iterate: SharedIterate) -> Result<RunOutcome>
    where
        G: Gradient,
        S: UpdateStrategy,
    {
        let threads = NonZeroUsize::new(self.config.threads)
            .ok_or_else(|| Error::InvalidConfig("threads must be at least 1".into()))?;

        Orchestrator::new(threads)
            .seed(self.worker_seed)
            .track_phases(self.config.track_phases)
            .clock(self.config.clock)
            .run_from::<G, S>(problem, self.dataset, iterate)
    }
}

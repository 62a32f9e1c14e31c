use std::num::NonZeroUsize;

use hogwild::{
    Orchestrator, Problem, RunConfig, SharedIterate, configs,
    configs::{InitSpec, StrategyKind},
    data::{Dataset, SparseVector, SyntheticSpec},
    problem::LinearRegression,
    strategies::{Hogwild, Shared},
};

fn threads(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[test]
fn parallel_run_lowers_the_loss() {
    let (dataset, _) = SyntheticSpec::new(1_000, 50, 0.1).generate().unwrap();
    let problem = Problem::new(LinearRegression, 1e-3, 100_000, 50).unwrap();

    let outcome = Orchestrator::new(threads(8))
        .seed(1000)
        .run::<_, Hogwild>(&problem, &dataset)
        .unwrap();

    let initial = dataset.loss(&LinearRegression, &vec![0.; 50]);
    let last = dataset.loss(&LinearRegression, &outcome.iterate);

    assert_eq!(outcome.iterations, 100_000);
    assert!(last < initial, "{last} >= {initial}");
}

#[test]
fn log_is_bounded_and_ordered() {
    let (dataset, _) = SyntheticSpec::new(100, 10, 0.3).generate().unwrap();

    for (iterations, log_points, expected) in [(10_000, 50, 50), (6, 50, 6), (8, 1, 1)] {
        let problem = Problem::new(LinearRegression, 1e-3, iterations, log_points).unwrap();

        let outcome = Orchestrator::new(threads(2))
            .run::<_, Hogwild>(&problem, &dataset)
            .unwrap();

        let log = outcome.log.entries();
        assert_eq!(log.len(), expected);
        assert!(log.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(log.windows(2).all(|w| w[0].iteration < w[1].iteration));
        assert_eq!(log.last().unwrap().iteration, outcome.iterations);
    }
}

#[test]
fn empty_budget_returns_the_start_point() {
    let x = SparseVector::from_pairs([(1, 1.)]);
    let dataset = Dataset::new(vec![x], vec![1.], 3).unwrap();
    let problem = Problem::new(LinearRegression, 0.5, 0, 50).unwrap();

    let outcome = Orchestrator::new(threads(4))
        .run_from::<_, Shared>(
            &problem,
            &dataset,
            SharedIterate::new(vec![0.5, -1., 3.]).unwrap(),
        )
        .unwrap();

    assert_eq!(outcome.iterate, [0.5, -1., 3.]);
    assert!(outcome.log.is_empty());
    assert!(outcome.workers.iter().all(|w| w.iterations == 0));
}

#[test]
fn seeded_single_thread_runs_are_reproducible() {
    let (dataset, _) = SyntheticSpec::new(200, 20, 0.2).generate().unwrap();
    let config = RunConfig {
        threads: 1,
        step_size: 1e-2,
        iterations: 5_000,
        log_points: 5,
        strategy: StrategyKind::Hogwild,
        seed: Some(77),
        init: InitSpec::Normal {
            mean: 0.,
            std_dev: 0.01,
        },
        ..RunConfig::default()
    };

    let a = configs::run(&config, &dataset).unwrap();
    let b = configs::run(&config, &dataset).unwrap();

    assert_eq!(a.initial, b.initial);
    assert_eq!(a.iterate, b.iterate);
}

use std::time::Duration;

use uttt_mcts::{
    config::{BestChildCriteria, MAX_TIME_BUDGET},
    BoardState, SearchConfig, UtttError, MCTS, PMCTS,
};

#[test]
fn test_config_builder_methods() {
    let config = SearchConfig::default()
        .with_exploration_constant(2.0)
        .with_time_budget(Duration::from_millis(250))
        .with_max_iterations(5000)
        .with_seed(99)
        .with_workers(3)
        .with_best_child_criteria(BestChildCriteria::HighestValue);

    assert_eq!(config.exploration_constant, 2.0);
    assert_eq!(config.time_budget, Duration::from_millis(250));
    assert_eq!(config.max_iterations, Some(5000));
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.workers, Some(3));
    assert_eq!(config.resolved_workers(), 3);
    assert_eq!(config.best_child_criteria, BestChildCriteria::HighestValue);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_default_values() {
    let config = SearchConfig::default();

    assert!((config.exploration_constant - 1.41).abs() < 1e-9);
    assert_eq!(config.time_budget, Duration::from_secs(1));
    assert_eq!(config.max_iterations, None);
    assert_eq!(config.seed, None);
    assert_eq!(config.workers, None);
    assert!(config.resolved_workers() >= 1);
    assert_eq!(config.best_child_criteria, BestChildCriteria::MostVisits);
    assert!(config.validate().is_ok());
}

#[test]
fn test_fractional_time_budget() {
    let config = SearchConfig::default().with_time_budget_secs(0.5);
    assert_eq!(config.time_budget, Duration::from_millis(500));

    let negative = SearchConfig::default().with_time_budget_secs(-1.0);
    assert_eq!(negative.time_budget, Duration::ZERO);

    let nan = SearchConfig::default().with_time_budget_secs(f64::NAN);
    assert_eq!(nan.time_budget, Duration::ZERO);

    let infinite = SearchConfig::default().with_time_budget_secs(f64::INFINITY);
    assert_eq!(infinite.time_budget, Duration::MAX);
}

#[test]
fn test_config_validation() {
    let invalid = [
        SearchConfig::default().with_exploration_constant(-0.5),
        SearchConfig::default().with_exploration_constant(f64::INFINITY),
        SearchConfig::default().with_max_iterations(0),
        SearchConfig::default().with_workers(0),
        SearchConfig::default().with_time_budget_secs(f64::INFINITY),
        SearchConfig::default().with_time_budget(Duration::MAX),
    ];

    for config in invalid {
        assert!(
            matches!(config.validate(), Err(UtttError::InvalidConfiguration(_))),
            "{config:?} should be rejected"
        );
    }
}

#[test]
fn test_unbounded_time_budget_is_rejected() {
    let longest = SearchConfig::default().with_time_budget(MAX_TIME_BUDGET);
    assert!(longest.validate().is_ok());

    let too_long = SearchConfig::default().with_time_budget(MAX_TIME_BUDGET + Duration::from_secs(1));
    assert!(matches!(
        too_long.validate(),
        Err(UtttError::InvalidConfiguration(_))
    ));

    // Neither engine accepts a budget it could never turn into a deadline.
    let infinite = SearchConfig::default().with_time_budget_secs(f64::INFINITY);
    assert!(matches!(
        MCTS::new(BoardState::new(), infinite.clone()),
        Err(UtttError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        PMCTS::<BoardState>::new(infinite.with_workers(2)),
        Err(UtttError::InvalidConfiguration(_))
    ));
}

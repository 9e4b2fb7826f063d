use std::collections::BTreeMap;
use std::time::Duration;

use uttt_mcts::{
    aggregate_root_stats, config::BestChildCriteria, utils::best_action, Action, ActionStats,
    BoardState, SearchConfig, PMCTS,
};

fn capped_config(iterations: usize, workers: usize, seed: u64) -> SearchConfig {
    SearchConfig::default()
        .with_time_budget(Duration::from_secs(60))
        .with_max_iterations(iterations)
        .with_workers(workers)
        .with_seed(seed)
}

fn visits(pairs: &[(char, u64)]) -> BTreeMap<char, ActionStats> {
    pairs
        .iter()
        .map(|&(action, n)| (action, ActionStats::new(n, 0.0)))
        .collect()
}

#[test]
fn test_aggregation_sums_worker_votes() {
    let per_worker = vec![
        visits(&[('a', 10), ('b', 5)]),
        visits(&[('a', 8), ('b', 7)]),
        visits(&[('a', 9), ('b', 6)]),
        visits(&[('a', 11), ('b', 4)]),
    ];

    let total = aggregate_root_stats(per_worker);

    assert_eq!(total[&'a'].visits, 38);
    assert_eq!(total[&'b'].visits, 22);
    assert_eq!(best_action(&total, BestChildCriteria::MostVisits), Some('a'));
}

#[test]
fn test_aggregation_keeps_partially_explored_actions() {
    let per_worker = vec![
        BTreeMap::from([('a', ActionStats::new(3, 1.5))]),
        BTreeMap::from([('a', ActionStats::new(1, -0.5)), ('c', ActionStats::new(2, 2.0))]),
    ];

    let total = aggregate_root_stats(per_worker);

    assert_eq!(total.len(), 2);
    assert_eq!(total[&'a'], ActionStats::new(4, 1.0));
    assert_eq!(total[&'c'], ActionStats::new(2, 2.0));
}

#[test]
fn test_parallel_visits_add_up() {
    let board = BoardState::new();
    let pmcts = PMCTS::new(capped_config(50, 4, 3)).unwrap();
    assert_eq!(pmcts.workers(), 4);

    let (action, stats) = pmcts.run_with_stats(&board).unwrap();

    assert!(board.is_legal(action));
    // Each worker's root is visited once per iteration.
    assert_eq!(stats.values().map(|s| s.visits).sum::<u64>(), 200);
}

#[test]
fn test_seeded_parallel_search_is_reproducible() {
    let mut board = BoardState::new();
    board.apply(Action::from_index(40).unwrap()).unwrap();

    let pmcts = PMCTS::new(capped_config(150, 3, 12)).unwrap();
    let first = pmcts.run_with_stats(&board).unwrap();
    let second = pmcts.run_with_stats(&board).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_single_worker_matches_its_own_rules() {
    let mut board = BoardState::new();
    board.apply(Action::from_index(40).unwrap()).unwrap();

    let pmcts = PMCTS::new(capped_config(100, 1, 5)).unwrap();
    let action = pmcts.run(&board).unwrap();

    assert_eq!(action.subboard(), (1, 1));
    assert!(board.is_legal(action));
}

#[test]
fn test_workers_get_distinct_reproducible_seeds() {
    let pmcts = PMCTS::<BoardState>::new(capped_config(10, 8, 77)).unwrap();

    let seeds = pmcts.worker_seeds().unwrap();
    assert_eq!(seeds.len(), 8);
    let distinct: std::collections::BTreeSet<u64> = seeds.iter().copied().collect();
    assert_eq!(distinct.len(), 8, "every worker needs its own random stream");

    assert_eq!(pmcts.worker_seeds().unwrap(), seeds);
}

#[test]
fn test_second_worker_searches_differently() {
    let board = BoardState::new();
    let single = PMCTS::new(capped_config(300, 1, 9)).unwrap();
    let pair = PMCTS::new(capped_config(300, 2, 9)).unwrap();

    // The first worker of both runs shares a seed. Had the second worker the
    // same stream, the pair would report exactly doubled statistics.
    let (_, alone) = single.run_with_stats(&board).unwrap();
    let (_, together) = pair.run_with_stats(&board).unwrap();

    let doubled: BTreeMap<Action, ActionStats> = alone
        .iter()
        .map(|(&action, stats)| (action, ActionStats::new(stats.visits * 2, stats.value_sum * 2.0)))
        .collect();
    assert_ne!(together, doubled);
}

//! Scoring helpers shared by the selection policy and both engines.

use std::collections::BTreeMap;

use crate::config::BestChildCriteria;
use crate::stats::ActionStats;

/// Calculates the exploration term of the UCT score
///
/// Unvisited children get an infinite bonus so every action is tried once
/// before any is revisited.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * ((parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// UCT score `mean + C * sqrt(ln(parent_visits) / child_visits)`
///
/// `mean` must already be expressed from the parent mover's perspective.
pub fn uct_score(mean: f64, child_visits: u64, parent_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    mean + exploration_term(parent_visits, child_visits, exploration_constant)
}

/// Picks the action to play from root statistics.
///
/// With [`BestChildCriteria::MostVisits`] the most visited action wins, ties
/// going to the higher mean value. With [`BestChildCriteria::HighestValue`]
/// the order is reversed. Remaining ties go to the lowest action, which the
/// `BTreeMap` iteration order guarantees.
pub fn best_action<A: Ord + Copy>(
    stats: &BTreeMap<A, ActionStats>,
    criteria: BestChildCriteria,
) -> Option<A> {
    let mut best: Option<(A, ActionStats)> = None;

    for (&action, candidate) in stats {
        let replace = match &best {
            None => true,
            Some((_, current)) => is_better(candidate, current, criteria),
        };
        if replace {
            best = Some((action, *candidate));
        }
    }

    best.map(|(action, _)| action)
}

fn is_better(candidate: &ActionStats, current: &ActionStats, criteria: BestChildCriteria) -> bool {
    match criteria {
        BestChildCriteria::MostVisits => {
            candidate.visits > current.visits
                || (candidate.visits == current.visits && candidate.mean() > current.mean())
        }
        BestChildCriteria::HighestValue => {
            candidate.mean() > current.mean()
                || (candidate.mean() == current.mean() && candidate.visits > current.visits)
        }
    }
}

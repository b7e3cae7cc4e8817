//! Bounded-round relaxation search.
//!
//! A round-based search in the spirit of RAPTOR without timetables: round `r`
//! holds the best arrival time at every node using at most `r` edges of the
//! configured modes. The answer is the fastest arrival at the goal over all
//! rounds, preferring the lowest round on ties.

use crate::error::Result;
use crate::network::{all_modes, Mode, NodeIndex, TransportGraph};
use crate::route::Route;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bounded-round search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Number of relaxation rounds
    pub max_rounds: usize,
    /// Modes whose edges are relaxed
    pub modes: BTreeSet<Mode>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig { max_rounds: 3, modes: all_modes() }
    }
}

/// A route found by the bounded-round search
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRoute {
    pub route: Route,
    /// Round in which the goal arrival was recorded
    pub rounds_used: usize,
}

/// Arrival times and predecessors for rounds `0..=max_rounds`
#[derive(Debug, Clone)]
pub struct RoundTable {
    start: NodeIndex,
    arrivals: Vec<Vec<f64>>,
    // (predecessor, round of the predecessor's arrival)
    predecessors: Vec<Vec<Option<(NodeIndex, usize)>>>,
}

impl RoundTable {
    /// Run every relaxation round from `start`.
    ///
    /// A shortest path visits at most `n` nodes, so arrivals are fixed after
    /// round `n - 1` and the table holds at most `n` rounds past round 0.
    pub fn build(graph: &TransportGraph, start: NodeIndex, config: &RoundConfig) -> Result<Self> {
        graph.try_node(start)?;
        let n = graph.node_count();
        let rounds = config.max_rounds.min(n) + 1;

        let mut arrivals = vec![vec![f64::INFINITY; n]; rounds];
        let mut predecessors: Vec<Vec<Option<(NodeIndex, usize)>>> = vec![vec![None; n]; rounds];
        arrivals[0][start] = 0.0;

        for r in 1..rounds {
            let (done, current) = arrivals.split_at_mut(r);
            let previous = &done[r - 1];
            let current = &mut current[0];
            current.copy_from_slice(previous);
            predecessors[r] = predecessors[r - 1].clone();

            let mut improved = 0usize;
            for (u, &time_u) in previous.iter().enumerate() {
                if time_u.is_infinite() {
                    continue;
                }
                for edge in graph.outgoing(u) {
                    if !config.modes.contains(&edge.mode()) {
                        continue;
                    }
                    let time = time_u + edge.travel_time();
                    if time < current[edge.to] {
                        current[edge.to] = time;
                        predecessors[r][edge.to] = Some((u, r - 1));
                        improved += 1;
                    }
                }
            }

            log::debug!("Round {}: {} arrivals improved", r, improved);
            if improved == 0 {
                // later rounds would be identical copies
                for later in r + 1..rounds {
                    arrivals[later] = arrivals[r].clone();
                    predecessors[later] = predecessors[r].clone();
                }
                break;
            }
        }

        Ok(RoundTable { start, arrivals, predecessors })
    }

    /// Last round held by the table, after clamping to the node count
    pub fn max_rounds(&self) -> usize {
        self.arrivals.len() - 1
    }

    /// Best arrival time at `node` after `round` rounds (infinite if unreached)
    pub fn arrival(&self, round: usize, node: NodeIndex) -> f64 {
        self.arrivals
            .get(round)
            .and_then(|times| times.get(node))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Lowest round holding the fastest arrival at `goal`
    pub fn best_round(&self, goal: NodeIndex) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (r, times) in self.arrivals.iter().enumerate() {
            let t = times.get(goal).copied().unwrap_or(f64::INFINITY);
            if t.is_finite() && best.map_or(true, |(_, b)| t < b) {
                best = Some((r, t));
            }
        }
        best
    }

    /// Walk predecessors back from `goal` in `round`. `None` if the chain
    /// does not lead back to the start.
    pub fn path_to(&self, goal: NodeIndex, round: usize) -> Option<Vec<NodeIndex>> {
        let mut path = vec![goal];
        let mut node = goal;
        let mut r = round;

        while node != self.start {
            let (prev, prev_round) = (*self.predecessors.get(r)?.get(node)?)?;
            // origin rounds strictly decrease, so this terminates
            if prev_round >= r {
                return None;
            }
            path.push(prev);
            node = prev;
            r = prev_round;
        }

        path.reverse();
        Some(path)
    }
}

/// Fastest route reachable within `config.max_rounds` relaxation rounds.
/// Returns `Ok(None)` when the goal cannot be reached.
pub fn bounded_round_search(
    graph: &TransportGraph,
    start: NodeIndex,
    goal: NodeIndex,
    config: &RoundConfig,
) -> Result<Option<RoundRoute>> {
    graph.try_node(goal)?;
    let table = RoundTable::build(graph, start, config)?;

    let Some((round, time)) = table.best_round(goal) else {
        log::debug!(
            "{} unreachable from {} within {} rounds",
            graph.node_id(goal),
            graph.node_id(start),
            config.max_rounds
        );
        return Ok(None);
    };

    let Some(path) = table.path_to(goal, round) else {
        log::warn!("Broken predecessor chain to {} in round {}", graph.node_id(goal), round);
        return Ok(None);
    };

    log::debug!("Reached {} in round {} at {:.1} min", graph.node_id(goal), round, time);
    let route = Route::from_path(graph, path)?;
    Ok(Some(RoundRoute { route, rounds_used: round }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{transit_modes, EdgeAttributes, Node};
    use crate::search::test_graphs::{line_graph, sample_city};

    #[test]
    fn test_line_graph_needs_two_rounds() {
        let g = line_graph();
        let one = RoundConfig { max_rounds: 1, ..Default::default() };
        assert!(bounded_round_search(&g, 0, 2, &one).unwrap().is_none());

        let found = bounded_round_search(&g, 0, 2, &RoundConfig::default()).unwrap().unwrap();
        assert_eq!(found.rounds_used, 2);
        assert_eq!(found.route.node_ids(&g), vec!["N1", "N2", "N3"]);
        assert_eq!(found.route.total_time(), 10.0);
    }

    #[test]
    fn test_car_only_goal_unreachable_by_transit() {
        let mut g = TransportGraph::new("car-only");
        for (i, id) in ["N1", "N2", "N3"].iter().enumerate() {
            g.add_node(Node::new(id, id, i as f64, 0.0)).unwrap();
        }
        g.add_symmetric_edge(0, 1, EdgeAttributes::new(Mode::Bus, 5.0, 1.0, 100.0)).unwrap();
        g.add_symmetric_edge(1, 2, EdgeAttributes::new(Mode::Car, 5.0, 1.0, 100.0)).unwrap();

        for max_rounds in 0..6 {
            let config = RoundConfig { max_rounds, modes: transit_modes() };
            assert!(bounded_round_search(&g, 0, 2, &config).unwrap().is_none());
        }
        let all = RoundConfig::default();
        assert!(bounded_round_search(&g, 0, 2, &all).unwrap().is_some());
    }

    #[test]
    fn test_zero_rounds_only_reaches_start() {
        let g = line_graph();
        let config = RoundConfig { max_rounds: 0, ..Default::default() };
        let found = bounded_round_search(&g, 1, 1, &config).unwrap().unwrap();
        assert_eq!(found.rounds_used, 0);
        assert_eq!(found.route.nodes(), &[1]);
        assert!(bounded_round_search(&g, 1, 2, &config).unwrap().is_none());
    }

    #[test]
    fn test_arrivals_non_increasing_across_rounds() {
        let g = sample_city();
        let table = RoundTable::build(&g, 0, &RoundConfig { max_rounds: 6, ..Default::default() }).unwrap();
        for r in 1..=table.max_rounds() {
            for node in 0..g.node_count() {
                assert!(table.arrival(r, node) <= table.arrival(r - 1, node));
            }
        }
    }

    #[test]
    fn test_more_rounds_never_slower() {
        let g = sample_city();
        for goal in 0..g.node_count() {
            let mut previous = f64::INFINITY;
            for max_rounds in 0..7 {
                let config = RoundConfig { max_rounds, ..Default::default() };
                let time = bounded_round_search(&g, 0, goal, &config)
                    .unwrap()
                    .map_or(f64::INFINITY, |found| found.route.total_time());
                assert!(time <= previous);
                previous = time;
            }
        }
    }

    #[test]
    fn test_fewer_rounds_trade_time_for_legs() {
        let g = sample_city();
        let a = g.node_index("A").unwrap();
        let f = g.node_index("F").unwrap();
        let modes: BTreeSet<Mode> = [Mode::Bus, Mode::Metro, Mode::Walk].into_iter().collect();

        let two = RoundConfig { max_rounds: 2, modes: modes.clone() };
        let three = RoundConfig { max_rounds: 3, modes };

        let short = bounded_round_search(&g, a, f, &two).unwrap();
        let long = bounded_round_search(&g, a, f, &three).unwrap().unwrap();
        assert!(short.is_none());
        assert!(long.rounds_used <= 3);
        assert_eq!(long.route.legs(), long.rounds_used);
        assert_eq!(long.route.node_ids(&g), vec!["A", "B", "C", "F"]);
    }

    #[test]
    fn test_huge_round_count_is_clamped() {
        let g = line_graph();
        let config = RoundConfig { max_rounds: usize::MAX, ..Default::default() };
        let table = RoundTable::build(&g, 0, &config).unwrap();
        assert_eq!(table.max_rounds(), 3);

        let found = bounded_round_search(&g, 0, 2, &config).unwrap().unwrap();
        assert_eq!(found.rounds_used, 2);
        assert_eq!(found.route.node_ids(&g), vec!["N1", "N2", "N3"]);
    }

    #[test]
    fn test_broken_predecessor_chain() {
        let g = line_graph();
        let table = RoundTable::build(&g, 0, &RoundConfig::default()).unwrap();
        // N3 has no predecessor before round 2
        assert_eq!(table.path_to(2, 1), None);
        assert_eq!(table.path_to(2, 2), Some(vec![0, 1, 2]));
        // out-of-range round
        assert_eq!(table.path_to(2, 10), None);

        // a predecessor pointing at the same round would never terminate
        let looping = RoundTable {
            start: 0,
            arrivals: vec![vec![0.0, f64::INFINITY], vec![0.0, 5.0]],
            predecessors: vec![vec![None, None], vec![None, Some((1, 1))]],
        };
        assert_eq!(looping.path_to(1, 1), None);
    }

    #[test]
    fn test_reconstruction_through_copied_rounds() {
        // G is first reached in round 2 and its arrival is copied forward;
        // M's predecessor lives in round 1 only.
        let mut g = TransportGraph::new("copies");
        for id in ["S", "M", "X", "G"] {
            g.add_node(Node::new(id, id, 0.0, 0.0)).unwrap();
        }
        g.add_edge(0, 1, EdgeAttributes::new(Mode::Bus, 10.0, 0.0, 0.0)).unwrap();
        g.add_edge(1, 3, EdgeAttributes::new(Mode::Bus, 1.0, 0.0, 0.0)).unwrap();
        g.add_edge(0, 2, EdgeAttributes::new(Mode::Bus, 1.0, 0.0, 0.0)).unwrap();
        g.add_edge(2, 3, EdgeAttributes::new(Mode::Bus, 30.0, 0.0, 0.0)).unwrap();

        let config = RoundConfig { max_rounds: 4, ..Default::default() };
        let table = RoundTable::build(&g, 0, &config).unwrap();
        assert_eq!(table.best_round(3), Some((2, 11.0)));
        assert_eq!(table.path_to(3, 4), Some(vec![0, 1, 3]));
    }
}

//! Constrained best-first search.
//!
//! Minimizes travel time from a start to a goal node while only using edges
//! of allowed modes and staying within optional cost and time budgets.
//! States are ordered by `f = time + h`, where `h` is the straight-line
//! distance divided by a travel speed.
//!
//! Per node, the last recorded `(time, cost)` pair is kept and any new state
//! that is no better on both is discarded. This is a dominance approximation,
//! not a full set of non-dominated labels per node.

use crate::error::{Result, RouterError};
use crate::network::{all_modes, Mode, NodeIndex, TransportGraph};
use crate::route::Route;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

/// Default speed for `HeuristicKind::FixedSpeed`, in planar units per minute
pub const DEFAULT_FIXED_SPEED: f64 = 0.03;

/// Remaining-time estimate used to order the queue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Straight-line distance over the fastest planar speed of any allowed edge
    Derived,
    /// Straight-line distance over a fixed speed (planar units per minute)
    FixedSpeed(f64),
    /// No estimate (uniform-cost search)
    Zero,
}

/// Constrained search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstrainedConfig {
    /// Modes that may be traversed
    pub allowed_modes: BTreeSet<Mode>,
    /// Upper bound on cumulative cost
    pub max_cost: Option<f64>,
    /// Upper bound on cumulative travel time (minutes)
    pub max_time: Option<f64>,
    pub heuristic: HeuristicKind,
}

impl Default for ConstrainedConfig {
    fn default() -> Self {
        ConstrainedConfig {
            allowed_modes: all_modes(),
            max_cost: None,
            max_time: None,
            heuristic: HeuristicKind::Derived,
        }
    }
}

impl ConstrainedConfig {
    pub fn with_modes<I: IntoIterator<Item = Mode>>(modes: I) -> Self {
        ConstrainedConfig { allowed_modes: modes.into_iter().collect(), ..Default::default() }
    }

    /// Budgets must be non-negative numbers and a fixed speed positive
    pub fn validate(&self) -> Result<()> {
        if self.max_cost.is_some_and(|v| v.is_nan() || v < 0.0) {
            return Err(RouterError::InvalidConfig("max_cost must be non-negative".into()));
        }
        if self.max_time.is_some_and(|v| v.is_nan() || v < 0.0) {
            return Err(RouterError::InvalidConfig("max_time must be non-negative".into()));
        }
        if let HeuristicKind::FixedSpeed(v) = self.heuristic {
            if !(v.is_finite() && v > 0.0) {
                return Err(RouterError::InvalidConfig("fixed heuristic speed must be positive".into()));
            }
        }
        Ok(())
    }
}

/// Label of a partial path
#[derive(Debug, Clone)]
struct Label {
    node: NodeIndex,
    time: f64,
    cost: f64,
    path: Vec<NodeIndex>,
}

/// Queue entry, ordered so that `BinaryHeap` pops the smallest key first.
///
/// Key: `f`, then fewer path nodes, then lower time, then smaller node id,
/// then insertion order.
struct QueueEntry<'g> {
    f: OrderedFloat<f64>,
    label: Label,
    node_id: &'g str,
    seq: u64,
}

impl QueueEntry<'_> {
    fn key(&self) -> (OrderedFloat<f64>, usize, OrderedFloat<f64>, &str, u64) {
        (self.f, self.label.path.len(), OrderedFloat(self.label.time), self.node_id, self.seq)
    }
}

impl PartialEq for QueueEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry<'_> {}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Remaining-time estimator bound to one graph and goal
struct Estimator<'g> {
    graph: &'g TransportGraph,
    goal: NodeIndex,
    speed: Option<f64>,
}

impl<'g> Estimator<'g> {
    fn new(graph: &'g TransportGraph, goal: NodeIndex, config: &ConstrainedConfig) -> Self {
        let speed = match config.heuristic {
            HeuristicKind::Derived => {
                let speed = max_planar_speed(graph, &config.allowed_modes);
                if speed.is_none() {
                    log::warn!("No allowed edge has planar displacement; searching without a heuristic");
                }
                speed
            }
            HeuristicKind::FixedSpeed(v) => Some(v),
            HeuristicKind::Zero => None,
        };
        Estimator { graph, goal, speed }
    }

    fn estimate(&self, node: NodeIndex) -> f64 {
        match self.speed {
            Some(speed) => self.graph.planar_distance(node, self.goal) / speed,
            None => 0.0,
        }
    }
}

/// Fastest straight-line speed (planar units per minute) over edges of the
/// given modes. Dividing a straight-line distance by it never overestimates
/// the time of any path of those modes.
pub fn max_planar_speed(graph: &TransportGraph, modes: &BTreeSet<Mode>) -> Option<f64> {
    let speed = graph
        .edges()
        .filter(|e| modes.contains(&e.mode()))
        .map(|e| graph.planar_distance(e.from, e.to) / e.travel_time())
        .fold(0.0_f64, f64::max);

    if speed > 0.0 && speed.is_finite() {
        Some(speed)
    } else {
        None
    }
}

/// Minimum-time route from `start` to `goal` under the configured modes and
/// budgets. Returns `Ok(None)` when no such route exists.
pub fn constrained_search(
    graph: &TransportGraph,
    start: NodeIndex,
    goal: NodeIndex,
    config: &ConstrainedConfig,
) -> Result<Option<Route>> {
    config.validate()?;
    graph.try_node(start)?;
    graph.try_node(goal)?;

    let estimator = Estimator::new(graph, goal, config);
    let mut best: Vec<Option<(f64, f64)>> = vec![None; graph.node_count()];
    best[start] = Some((0.0, 0.0));

    let mut queue = BinaryHeap::new();
    let mut seq = 0u64;
    queue.push(QueueEntry {
        f: OrderedFloat(estimator.estimate(start)),
        label: Label { node: start, time: 0.0, cost: 0.0, path: vec![start] },
        node_id: graph.node_id(start),
        seq,
    });

    let mut expanded = 0usize;
    while let Some(QueueEntry { label, .. }) = queue.pop() {
        if label.node == goal {
            log::debug!(
                "Best-first search reached {} after {} expansions (time {:.1}, cost {:.2})",
                graph.node_id(goal),
                expanded,
                label.time,
                label.cost
            );
            return Route::from_path(graph, label.path).map(Some);
        }
        expanded += 1;

        for edge in graph.outgoing(label.node) {
            if !config.allowed_modes.contains(&edge.mode()) {
                continue;
            }

            let time = label.time + edge.travel_time();
            let cost = label.cost + edge.cost();
            if config.max_time.is_some_and(|max| time > max) {
                continue;
            }
            if config.max_cost.is_some_and(|max| cost > max) {
                continue;
            }

            if let Some((best_time, best_cost)) = best[edge.to] {
                if time >= best_time && cost >= best_cost {
                    continue;
                }
            }
            best[edge.to] = Some((time, cost));

            let mut path = label.path.clone();
            path.push(edge.to);
            seq += 1;
            queue.push(QueueEntry {
                f: OrderedFloat(time + estimator.estimate(edge.to)),
                label: Label { node: edge.to, time, cost, path },
                node_id: graph.node_id(edge.to),
                seq,
            });
        }
    }

    log::debug!(
        "Best-first search exhausted after {} expansions: {} unreachable from {}",
        expanded,
        graph.node_id(goal),
        graph.node_id(start)
    );
    Ok(None)
}

//! Route representation and aggregate metrics.
//!
//! A [`Route`] is an ordered node sequence; its metrics are always derived
//! from the edges between consecutive nodes and never set independently.

use crate::error::{Result, RouterError};
use crate::network::{Mode, NodeIndex, TransportGraph};
use serde::{Deserialize, Serialize};

/// Aggregate metrics of a path
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Minutes
    pub total_time: f64,
    pub total_cost: f64,
    /// Meters
    pub total_distance: f64,
    /// Number of mode changes between consecutive edges
    pub transfers: usize,
    /// Mode of every edge, in order
    pub modes: Vec<Mode>,
}

/// Compute the metrics of an arbitrary node sequence.
///
/// Paths with fewer than two nodes have zero metrics. A consecutive pair that
/// is not an edge of the graph is a structural error.
pub fn route_metrics(graph: &TransportGraph, path: &[NodeIndex]) -> Result<RouteMetrics> {
    let mut metrics = RouteMetrics::default();
    if path.len() < 2 {
        return Ok(metrics);
    }

    let mut last_mode: Option<Mode> = None;
    for pair in path.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        let edge = graph.edge(u, v).ok_or_else(|| RouterError::MissingEdge {
            from: graph.node_id(u).to_string(),
            to: graph.node_id(v).to_string(),
        })?;

        metrics.total_time += edge.travel_time();
        metrics.total_cost += edge.cost();
        metrics.total_distance += edge.attrs.distance;

        let mode = edge.mode();
        if last_mode.is_some_and(|m| m != mode) {
            metrics.transfers += 1;
        }
        last_mode = Some(mode);
        metrics.modes.push(mode);
    }

    Ok(metrics)
}

/// A path through the network together with its derived metrics
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    nodes: Vec<NodeIndex>,
    metrics: RouteMetrics,
}

impl Route {
    /// Build a route from a node sequence, computing its metrics
    pub fn from_path(graph: &TransportGraph, nodes: Vec<NodeIndex>) -> Result<Self> {
        for &n in &nodes {
            graph.try_node(n)?;
        }
        let metrics = route_metrics(graph, &nodes)?;
        Ok(Route { nodes, metrics })
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn metrics(&self) -> &RouteMetrics {
        &self.metrics
    }

    pub fn total_time(&self) -> f64 {
        self.metrics.total_time
    }

    pub fn total_cost(&self) -> f64 {
        self.metrics.total_cost
    }

    pub fn transfers(&self) -> usize {
        self.metrics.transfers
    }

    /// Number of edges traversed
    pub fn legs(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn node_ids<'g>(&self, graph: &'g TransportGraph) -> Vec<&'g str> {
        self.nodes.iter().map(|&n| graph.node_id(n)).collect()
    }

    /// Serializable rendering with node identifiers
    pub fn summary(&self, graph: &TransportGraph, algorithm: &str) -> RouteSummary {
        RouteSummary {
            algorithm: algorithm.to_string(),
            path: self.node_ids(graph).into_iter().map(str::to_string).collect(),
            total_time: self.metrics.total_time,
            total_cost: self.metrics.total_cost,
            total_distance: self.metrics.total_distance,
            transfers: self.metrics.transfers,
            modes: self.metrics.modes.clone(),
            rounds_used: None,
        }
    }
}

/// A route rendered for output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    pub algorithm: String,
    pub path: Vec<String>,
    pub total_time: f64,
    pub total_cost: f64,
    pub total_distance: f64,
    pub transfers: usize,
    pub modes: Vec<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds_used: Option<usize>,
}

impl std::fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Route ({})", self.algorithm)?;
        writeln!(f, "  Path: {}", self.path.join(" -> "))?;
        writeln!(f, "  Time: {:.1} min", self.total_time)?;
        writeln!(f, "  Cost: {:.2}", self.total_cost)?;
        writeln!(f, "  Distance: {:.0} m", self.total_distance)?;
        writeln!(f, "  Transfers: {}", self.transfers)?;
        let modes: Vec<&str> = self.modes.iter().map(Mode::as_str).collect();
        writeln!(f, "  Modes: {}", modes.join(", "))?;
        if let Some(rounds) = self.rounds_used {
            writeln!(f, "  Rounds used: {}", rounds)?;
        }
        Ok(())
    }
}

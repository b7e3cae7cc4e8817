//! Transport network representation.
//!
//! A directed graph of stations (nodes) joined by mode-tagged edges. Every
//! search in this crate consumes the graph read-only through this module.
//! Edges are stored as outgoing adjacency lists; there is at most one edge per
//! ordered pair of nodes.

use crate::error::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Index of a node inside a [`TransportGraph`]
pub type NodeIndex = usize;

/// Transport mode carried by an edge
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Metro,
    Bus,
    Train,
    Walk,
    Bike,
    Car,
}

impl Mode {
    pub const ALL: [Mode; 6] = [Mode::Metro, Mode::Bus, Mode::Train, Mode::Walk, Mode::Bike, Mode::Car];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Metro => "metro",
            Mode::Bus => "bus",
            Mode::Train => "train",
            Mode::Walk => "walk",
            Mode::Bike => "bike",
            Mode::Car => "car",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metro" => Ok(Mode::Metro),
            "bus" => Ok(Mode::Bus),
            "train" => Ok(Mode::Train),
            "walk" => Ok(Mode::Walk),
            "bike" => Ok(Mode::Bike),
            "car" => Ok(Mode::Car),
            _ => Err(RouterError::UnknownMode(s.to_string())),
        }
    }
}

/// Every supported mode
pub fn all_modes() -> BTreeSet<Mode> {
    Mode::ALL.iter().copied().collect()
}

/// Scheduled public transport only (metro, bus, train)
pub fn transit_modes() -> BTreeSet<Mode> {
    [Mode::Metro, Mode::Bus, Mode::Train].into_iter().collect()
}

/// A station or stop of the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier (e.g. "N1")
    pub id: String,
    /// Display name
    pub name: String,
    /// Planar X coordinate
    pub x: f64,
    /// Planar Y coordinate
    pub y: f64,
    pub has_metro: bool,
    pub has_bus: bool,
    pub has_train: bool,
    pub has_bike: bool,
}

impl Node {
    /// Node with no capability flags set
    pub fn new(id: &str, name: &str, x: f64, y: f64) -> Self {
        Node {
            id: id.to_string(),
            name: name.to_string(),
            x,
            y,
            has_metro: false,
            has_bus: false,
            has_train: false,
            has_bike: false,
        }
    }

    /// Straight-line planar distance to another node
    pub fn planar_distance(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Attributes of a directed edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttributes {
    pub mode: Mode,
    /// Minutes, strictly positive
    pub travel_time: f64,
    /// Currency units, non-negative
    pub cost: f64,
    /// Meters, non-negative
    pub distance: f64,
    pub is_transfer: bool,
}

impl EdgeAttributes {
    pub fn new(mode: Mode, travel_time: f64, cost: f64, distance: f64) -> Self {
        EdgeAttributes { mode, travel_time, cost, distance, is_transfer: false }
    }

    fn check(&self) -> std::result::Result<(), &'static str> {
        if !(self.travel_time.is_finite() && self.travel_time > 0.0) {
            return Err("travel time must be positive");
        }
        if !(self.cost.is_finite() && self.cost >= 0.0) {
            return Err("cost must be non-negative");
        }
        if !(self.distance.is_finite() && self.distance >= 0.0) {
            return Err("distance must be non-negative");
        }
        Ok(())
    }
}

/// A directed, mode-tagged edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub attrs: EdgeAttributes,
}

impl Edge {
    #[inline]
    pub fn mode(&self) -> Mode {
        self.attrs.mode
    }

    #[inline]
    pub fn travel_time(&self) -> f64 {
        self.attrs.travel_time
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.attrs.cost
    }
}

/// Directed multimodal transport graph
#[derive(Debug, Clone, Default)]
pub struct TransportGraph {
    /// Name of the network
    pub name: String,
    nodes: Vec<Node>,
    index: HashMap<String, NodeIndex>,
    outgoing: Vec<Vec<Edge>>,
}

impl TransportGraph {
    pub fn new(name: &str) -> Self {
        TransportGraph { name: name.to_string(), ..Default::default() }
    }

    /// Add a node, returning its index
    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex> {
        if self.index.contains_key(&node.id) {
            return Err(RouterError::DuplicateNode(node.id));
        }
        let idx = self.nodes.len();
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        self.outgoing.push(Vec::new());
        Ok(idx)
    }

    /// Insert the directed edge `from -> to`, replacing the attributes of an
    /// existing edge between the same ordered pair.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, attrs: EdgeAttributes) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if let Err(reason) = attrs.check() {
            return Err(RouterError::InvalidEdge {
                from: self.nodes[from].id.clone(),
                to: self.nodes[to].id.clone(),
                reason,
            });
        }

        let edges = &mut self.outgoing[from];
        match edges.iter_mut().find(|e| e.to == to) {
            Some(existing) => existing.attrs = attrs,
            None => edges.push(Edge { from, to, attrs }),
        }
        Ok(())
    }

    /// Insert `from -> to` and, unless already present, the reverse edge with
    /// identical attributes.
    pub fn add_symmetric_edge(&mut self, from: NodeIndex, to: NodeIndex, attrs: EdgeAttributes) -> Result<()> {
        self.add_edge(from, to, attrs)?;
        if !self.has_edge(to, from) {
            self.add_edge(to, from, attrs)?;
        }
        Ok(())
    }

    fn check_index(&self, idx: NodeIndex) -> Result<()> {
        if idx < self.nodes.len() {
            Ok(())
        } else {
            Err(RouterError::UnknownNodeIndex(idx))
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.iter().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Node by index, as an error if out of bounds
    pub fn try_node(&self, idx: NodeIndex) -> Result<&Node> {
        self.nodes.get(idx).ok_or(RouterError::UnknownNodeIndex(idx))
    }

    /// Identifier of a node, `"?"` if out of bounds
    pub fn node_id(&self, idx: NodeIndex) -> &str {
        self.nodes.get(idx).map(|n| n.id.as_str()).unwrap_or("?")
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Look up a node index by identifier, as an error if missing
    pub fn require_node(&self, id: &str) -> Result<NodeIndex> {
        self.node_index(id).ok_or_else(|| RouterError::UnknownNode(id.to_string()))
    }

    /// Outgoing edges of a node (empty for unknown indices)
    pub fn outgoing(&self, idx: NodeIndex) -> &[Edge] {
        self.outgoing.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge(&self, from: NodeIndex, to: NodeIndex) -> Option<&Edge> {
        self.outgoing(from).iter().find(|e| e.to == to)
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.edge(from, to).is_some()
    }

    /// All edges, grouped by source node
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.outgoing.iter().flatten()
    }

    /// Straight-line planar distance between two nodes
    pub fn planar_distance(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(na), Some(nb)) => na.planar_distance(nb),
            _ => 0.0,
        }
    }

    /// Get statistics about the network
    pub fn statistics(&self) -> GraphStatistics {
        let mut edges_per_mode: BTreeMap<Mode, usize> = BTreeMap::new();
        let mut transfer_edges = 0;
        let mut total_time = 0.0;
        let mut total_cost = 0.0;

        for edge in self.edges() {
            *edges_per_mode.entry(edge.mode()).or_insert(0) += 1;
            if edge.attrs.is_transfer {
                transfer_edges += 1;
            }
            total_time += edge.travel_time();
            total_cost += edge.cost();
        }

        let num_edges = self.edge_count();
        let (avg_travel_time, avg_cost) = if num_edges > 0 {
            (total_time / num_edges as f64, total_cost / num_edges as f64)
        } else {
            (0.0, 0.0)
        };

        GraphStatistics {
            name: self.name.clone(),
            num_nodes: self.node_count(),
            num_edges,
            edges_per_mode,
            transfer_edges,
            avg_travel_time,
            avg_cost,
        }
    }
}

/// Statistics about a transport network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub name: String,
    pub num_nodes: usize,
    pub num_edges: usize,
    pub edges_per_mode: BTreeMap<Mode, usize>,
    pub transfer_edges: usize,
    pub avg_travel_time: f64,
    pub avg_cost: f64,
}

impl fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network: {}", self.name)?;
        writeln!(f, "  Nodes: {}", self.num_nodes)?;
        writeln!(f, "  Directed edges: {}", self.num_edges)?;
        for (mode, count) in &self.edges_per_mode {
            writeln!(f, "    {:<6} {}", mode, count)?;
        }
        writeln!(f, "  Transfer edges: {}", self.transfer_edges)?;
        writeln!(f, "  Avg travel time: {:.2} min", self.avg_travel_time)?;
        writeln!(f, "  Avg cost: {:.2}", self.avg_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_graph() -> TransportGraph {
        let mut g = TransportGraph::new("test");
        g.add_node(Node::new("A", "Alpha", 0.0, 0.0)).unwrap();
        g.add_node(Node::new("B", "Beta", 3.0, 4.0)).unwrap();
        g
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Metro".parse::<Mode>().unwrap(), Mode::Metro);
        assert_eq!(" walk ".parse::<Mode>().unwrap(), Mode::Walk);
        assert!("tram".parse::<Mode>().is_err());
        assert_eq!(Mode::Bike.to_string(), "bike");
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut g = two_node_graph();
        let err = g.add_node(Node::new("A", "Again", 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateNode(id) if id == "A"));
    }

    #[test]
    fn test_add_edge_replaces_same_pair() {
        let mut g = two_node_graph();
        g.add_edge(0, 1, EdgeAttributes::new(Mode::Bus, 10.0, 2.0, 500.0)).unwrap();
        g.add_edge(0, 1, EdgeAttributes::new(Mode::Metro, 4.0, 3.0, 500.0)).unwrap();

        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge(0, 1).unwrap().mode(), Mode::Metro);
        assert!(!g.has_edge(1, 0));
    }

    #[test]
    fn test_symmetric_edge_keeps_existing_reverse() {
        let mut g = two_node_graph();
        g.add_edge(1, 0, EdgeAttributes::new(Mode::Walk, 30.0, 0.0, 500.0)).unwrap();
        g.add_symmetric_edge(0, 1, EdgeAttributes::new(Mode::Bus, 10.0, 2.0, 500.0)).unwrap();

        assert_eq!(g.edge(0, 1).unwrap().mode(), Mode::Bus);
        assert_eq!(g.edge(1, 0).unwrap().mode(), Mode::Walk);
    }

    #[test]
    fn test_invalid_edge_attributes() {
        let mut g = two_node_graph();
        let err = g.add_edge(0, 1, EdgeAttributes::new(Mode::Bus, 0.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, RouterError::InvalidEdge { .. }));
        let err = g.add_edge(0, 1, EdgeAttributes::new(Mode::Bus, 1.0, -1.0, 1.0)).unwrap_err();
        assert!(matches!(err, RouterError::InvalidEdge { .. }));
        assert!(matches!(
            g.add_edge(0, 7, EdgeAttributes::new(Mode::Bus, 1.0, 1.0, 1.0)),
            Err(RouterError::UnknownNodeIndex(7))
        ));
    }

    #[test]
    fn test_planar_distance_and_statistics() {
        let mut g = two_node_graph();
        assert!((g.planar_distance(0, 1) - 5.0).abs() < 1e-10);

        g.add_symmetric_edge(0, 1, EdgeAttributes::new(Mode::Train, 6.0, 4.0, 5000.0)).unwrap();
        let stats = g.statistics();
        assert_eq!(stats.num_nodes, 2);
        assert_eq!(stats.num_edges, 2);
        assert_eq!(stats.edges_per_mode.get(&Mode::Train), Some(&2));
        assert!((stats.avg_travel_time - 6.0).abs() < 1e-10);
    }
}

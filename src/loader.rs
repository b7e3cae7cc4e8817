//! Loading transport networks from tabular files.
//!
//! Two CSV files describe a network:
//!
//! - `nodes.csv`: `node_id,name,x,y,has_metro,has_bus,has_train,has_bike`
//! - `edges.csv`: `from,to,mode,travel_time_min,cost_tl,distance_m,is_transfer`
//!
//! Every edge row is added in its listed direction and mirrored with the same
//! attributes unless the reverse direction is already present.

use crate::error::Result;
use crate::network::{EdgeAttributes, Mode, Node, TransportGraph};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct NodeRecord {
    node_id: String,
    name: String,
    x: f64,
    y: f64,
    #[serde(default)]
    has_metro: u8,
    #[serde(default)]
    has_bus: u8,
    #[serde(default)]
    has_train: u8,
    #[serde(default)]
    has_bike: u8,
}

impl From<NodeRecord> for Node {
    fn from(r: NodeRecord) -> Self {
        Node {
            id: r.node_id.trim().to_string(),
            name: r.name,
            x: r.x,
            y: r.y,
            has_metro: r.has_metro != 0,
            has_bus: r.has_bus != 0,
            has_train: r.has_train != 0,
            has_bike: r.has_bike != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: String,
    to: String,
    mode: String,
    travel_time_min: f64,
    cost_tl: f64,
    distance_m: f64,
    #[serde(default)]
    is_transfer: u8,
}

/// Load a network from `nodes.csv` and `edges.csv` files
pub fn load_graph<P: AsRef<Path>, Q: AsRef<Path>>(nodes_path: P, edges_path: Q) -> Result<TransportGraph> {
    let name = nodes_path
        .as_ref()
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "network".to_string());

    let nodes = File::open(nodes_path.as_ref())?;
    let edges = File::open(edges_path.as_ref())?;
    let mut graph = load_graph_from_readers(nodes, edges)?;
    graph.name = name;
    Ok(graph)
}

/// Load a network from any pair of CSV readers
pub fn load_graph_from_readers<R1: Read, R2: Read>(nodes: R1, edges: R2) -> Result<TransportGraph> {
    let mut graph = TransportGraph::new("network");

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(nodes);
    for record in reader.deserialize::<NodeRecord>() {
        graph.add_node(record?.into())?;
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(edges);
    let mut rows = 0usize;
    for record in reader.deserialize::<EdgeRecord>() {
        let record = record?;
        let from = graph.require_node(&record.from)?;
        let to = graph.require_node(&record.to)?;
        let attrs = EdgeAttributes {
            mode: record.mode.parse::<Mode>()?,
            travel_time: record.travel_time_min,
            cost: record.cost_tl,
            distance: record.distance_m,
            is_transfer: record.is_transfer != 0,
        };
        graph.add_symmetric_edge(from, to, attrs)?;
        rows += 1;
    }

    log::info!(
        "Loaded network: {} nodes, {} edge rows, {} directed edges",
        graph.node_count(),
        rows,
        graph.edge_count()
    );

    Ok(graph)
}

//! Multimodal Route Planner Library
//!
//! Route search over a multimodal transport network (metro, bus, train, walk,
//! bike, car) under several objectives: travel time, monetary cost and number
//! of mode transfers.
//!
//! # Features
//!
//! - Constrained best-first search: fastest route within cost/time budgets and
//!   a set of allowed modes
//! - Bounded-round relaxation search: fastest route using at most a given
//!   number of legs
//! - Multi-objective evolutionary search (NSGA-II style): Pareto front over
//!   (time, cost, transfers)
//! - CSV network loader, JSON configuration and benchmarking tools
//!
//! # Example
//!
//! ```no_run
//! use multimodal_router::loader::load_graph;
//! use multimodal_router::search::{constrained_search, ConstrainedConfig};
//!
//! let graph = load_graph("data/nodes.csv", "data/edges.csv").unwrap();
//! let start = graph.require_node("N1").unwrap();
//! let goal = graph.require_node("N8").unwrap();
//!
//! let config = ConstrainedConfig { max_cost: Some(20.0), ..Default::default() };
//! match constrained_search(&graph, start, goal, &config).unwrap() {
//!     Some(route) => println!("{}", route.summary(&graph, "best-first")),
//!     None => println!("No route under these constraints"),
//! }
//! ```

pub mod benchmark;
pub mod config;
pub mod error;
pub mod loader;
pub mod network;
pub mod route;
pub mod search;

pub use config::SearchConfig;
pub use error::{Result, RouterError};
pub use network::{Mode, Node, NodeIndex, TransportGraph};
pub use route::{route_metrics, Route, RouteMetrics};

//! Route search algorithms.
//!
//! All searches read the graph without modifying it and return
//! `Ok(None)` (or an empty front) when no route exists.

pub mod archive;
pub mod constrained;
pub mod evolutionary;
pub mod rounds;

pub use archive::*;
pub use constrained::*;
pub use evolutionary::*;
pub use rounds::*;

#[cfg(test)]
pub(crate) mod test_graphs {
    use crate::network::{EdgeAttributes, Mode, Node, TransportGraph};

    /// N1 - N2 - N3 joined by walking edges of 5 minutes and cost 1
    pub fn line_graph() -> TransportGraph {
        let mut g = TransportGraph::new("line");
        for (i, id) in ["N1", "N2", "N3"].iter().enumerate() {
            g.add_node(Node::new(id, id, i as f64, 0.0)).unwrap();
        }
        g.add_symmetric_edge(0, 1, EdgeAttributes::new(Mode::Walk, 5.0, 1.0, 100.0)).unwrap();
        g.add_symmetric_edge(1, 2, EdgeAttributes::new(Mode::Walk, 5.0, 1.0, 100.0)).unwrap();
        g
    }

    /// Seven stations with every mode represented
    pub fn sample_city() -> TransportGraph {
        let mut g = TransportGraph::new("city");
        let stations = [
            ("A", 0.0, 0.0),
            ("B", 2.0, 0.0),
            ("C", 4.0, 0.0),
            ("D", 2.0, 2.0),
            ("E", 4.0, 2.0),
            ("F", 6.0, 1.0),
            ("G", 3.0, -2.0),
        ];
        for (id, x, y) in stations {
            g.add_node(Node::new(id, id, x, y)).unwrap();
        }

        let edges = [
            ("A", "B", Mode::Metro, 4.0, 3.0),
            ("B", "C", Mode::Metro, 4.0, 3.0),
            ("C", "F", Mode::Bus, 10.0, 2.0),
            ("A", "D", Mode::Bus, 12.0, 2.0),
            ("D", "E", Mode::Walk, 20.0, 0.0),
            ("E", "F", Mode::Bus, 8.0, 2.0),
            ("A", "F", Mode::Car, 9.0, 15.0),
            ("B", "D", Mode::Walk, 16.0, 0.0),
            ("D", "C", Mode::Bus, 9.0, 2.0),
            ("C", "G", Mode::Train, 6.0, 4.0),
            ("G", "F", Mode::Train, 7.0, 4.0),
            ("A", "G", Mode::Bike, 12.0, 1.0),
        ];
        for (from, to, mode, time, cost) in edges {
            let u = g.node_index(from).unwrap();
            let v = g.node_index(to).unwrap();
            let distance = g.planar_distance(u, v) * 1000.0;
            g.add_symmetric_edge(u, v, EdgeAttributes::new(mode, time, cost, distance)).unwrap();
        }
        g
    }
}

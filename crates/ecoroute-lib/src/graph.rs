use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::dataset::EdgeRecord;

/// Travel time unit used on every edge.
pub type Minutes = u32;

/// Travel mode selecting which cost field of an edge a search reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Driving,
    Walking,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
        };
        f.write_str(value)
    }
}

/// Costs attached to a connection. `None` marks the mode as unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EdgeData {
    pub driving: Option<Minutes>,
    pub walking: Option<Minutes>,
}

impl EdgeData {
    pub fn new(driving: Option<Minutes>, walking: Option<Minutes>) -> Self {
        Self { driving, walking }
    }

    /// Cost of traversing this edge in the given mode, if the mode may use it.
    pub fn cost(&self, mode: TravelMode) -> Option<Minutes> {
        match mode {
            TravelMode::Driving => self.driving,
            TravelMode::Walking => self.walking,
        }
    }

    /// Whether neither mode can use this edge.
    pub fn is_unusable(&self) -> bool {
        self.driving.is_none() && self.walking.is_none()
    }
}

/// Directed adjacency entry within the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub target: String,
    pub data: EdgeData,
}

/// Bidirectional multigraph keyed by location code.
///
/// The store has no notion of undirected edges: [`Graph::add_edge`] simply
/// inserts both directions with the same costs. Once built it is only read.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<String, Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `from -> to` and `to -> from` with identical costs.
    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        driving: Option<Minutes>,
        walking: Option<Minutes>,
    ) {
        let data = EdgeData::new(driving, walking);
        self.adjacency
            .entry(from.to_string())
            .or_default()
            .push(Edge {
                target: to.to_string(),
                data,
            });
        self.adjacency.entry(to.to_string()).or_default().push(Edge {
            target: from.to_string(),
            data,
        });
        self.edge_count += 1;
    }

    /// Return the neighbours for a given location code.
    ///
    /// Unknown codes yield an empty slice.
    pub fn neighbours(&self, node: &str) -> &[Edge] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First registered edge data for the directed pair `from -> to`.
    pub fn edge_between(&self, from: &str, to: &str) -> Option<&EdgeData> {
        self.neighbours(from)
            .iter()
            .find(|edge| edge.target == to)
            .map(|edge| &edge.data)
    }

    /// Cheapest `mode` cost over every parallel `from -> to` edge.
    pub fn segment_cost(&self, from: &str, to: &str, mode: TravelMode) -> Option<Minutes> {
        self.neighbours(from)
            .iter()
            .filter(|edge| edge.target == to)
            .filter_map(|edge| edge.data.cost(mode))
            .min()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of `add_edge` calls, i.e. undirected connections.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }
}

/// Build the routing graph from parsed edge records.
pub fn build_graph(edges: &[EdgeRecord]) -> Graph {
    let mut graph = Graph::new();
    for edge in edges {
        graph.add_edge(&edge.from, &edge.to, edge.driving, edge.walking);
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_inserts_both_directions() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", Some(5), None);

        assert_eq!(
            graph.neighbours("A"),
            &[Edge {
                target: "B".to_string(),
                data: EdgeData::new(Some(5), None),
            }]
        );
        assert_eq!(
            graph.neighbours("B"),
            &[Edge {
                target: "A".to_string(),
                data: EdgeData::new(Some(5), None),
            }]
        );
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn unknown_node_has_no_neighbours() {
        let graph = Graph::new();
        assert!(graph.neighbours("missing").is_empty());
        assert!(!graph.contains("missing"));
    }

    #[test]
    fn parallel_edges_are_kept_in_insertion_order() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", Some(9), Some(20));
        graph.add_edge("A", "B", Some(3), None);

        let costs: Vec<_> = graph
            .neighbours("A")
            .iter()
            .map(|edge| edge.data.driving)
            .collect();
        assert_eq!(costs, vec![Some(9), Some(3)]);
        assert_eq!(
            graph.edge_between("B", "A"),
            Some(&EdgeData::new(Some(9), Some(20)))
        );
    }

    #[test]
    fn edge_cost_follows_mode() {
        let data = EdgeData::new(None, Some(12));
        assert_eq!(data.cost(TravelMode::Driving), None);
        assert_eq!(data.cost(TravelMode::Walking), Some(12));
        assert!(!data.is_unusable());
        assert!(EdgeData::default().is_unusable());
    }
}

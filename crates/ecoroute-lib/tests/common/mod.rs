//! Common test utilities and fixture helpers.
//!
//! The fixture network under `docs/fixtures/` is a small city: a harbour,
//! old town, market, university, riverside, station and cathedral, plus an
//! island with no connections at all.

use std::path::PathBuf;

use ecoroute_lib::{Dataset, DatasetPaths, Graph};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Paths to the fixture location and distance tables.
#[allow(dead_code)]
pub fn fixture_paths() -> DatasetPaths {
    let dir = fixtures_dir();
    DatasetPaths::new(dir.join("Locations.csv"), dir.join("Distances.csv"))
}

/// Load the fixture dataset.
#[allow(dead_code)]
pub fn fixture_dataset() -> Dataset {
    fixture_paths().load().expect("fixture dataset loads")
}

/// A-B (drive 5, walk 10), B-C (drive 5, walk 10), A-C (drive 20, no walking).
#[allow(dead_code)]
pub fn triangle() -> Graph {
    let mut graph = Graph::new();
    graph.add_edge("A", "B", Some(5), Some(10));
    graph.add_edge("B", "C", Some(5), Some(10));
    graph.add_edge("A", "C", Some(20), None);
    graph
}

/// Convert string literals into an owned path.
#[allow(dead_code)]
pub fn path(nodes: &[&str]) -> Vec<String> {
    nodes.iter().map(|node| node.to_string()).collect()
}

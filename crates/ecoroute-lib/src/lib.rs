//! ecoroute library entry points.
//!
//! This crate loads the location and distance tables, builds the dual-cost
//! (driving/walking) graph and runs the route searches: fastest, alternative,
//! restricted and drive-park-walk eco routes. Higher-level consumers (the CLI)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

pub mod batch;
pub mod dataset;
pub mod eco;
pub mod error;
pub mod graph;
pub mod output;
pub mod path;
pub mod routing;

pub use batch::{run_batch, BatchMode, BatchRequest};
pub use dataset::{
    clean_code, load_edges_from_path, load_edges_from_reader, Dataset, DatasetPaths, EdgeRecord,
    Location, LocationId, LocationTable,
};
pub use eco::{eco_route, EcoRoute, EcoStatus};
pub use error::{Error, Result};
pub use graph::{build_graph, Edge, EdgeData, Graph, Minutes, TravelMode};
pub use output::{format_route, BatchReport, RouteSummary, UNKNOWN_ID};
pub use path::{find_route, find_route_dijkstra, find_route_with, SearchConstraints, Segment};
pub use routing::{
    alternative_constraints, alternative_path, path_cost, path_length, plan_route,
    restricted_path, shortest_path, RouteConstraints, RouteKind, RouteLeg, RoutePlan,
    RouteRequest,
};

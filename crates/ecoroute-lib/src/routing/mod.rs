//! Route planning operations.
//!
//! This module provides:
//! - [`shortest_path`], [`restricted_path`], [`alternative_path`] - the
//!   driving searches, all built on [`crate::path::find_route_with`]
//! - [`path_cost`] / [`path_length`] - evaluators for an already found path
//! - [`RouteRequest`] / [`RoutePlan`] / [`plan_route`] - a higher-level entry
//!   point that resolves user-facing location names before searching
//!
//! # Strategy Pattern
//!
//! [`plan_route`] dispatches through the [`RoutePlanner`] trait. Each route
//! kind (fastest, alternative, restricted, eco) is encapsulated in its own
//! planner struct.
//!
//! # Example
//!
//! ```ignore
//! use ecoroute_lib::{plan_route, DatasetPaths, RouteRequest};
//!
//! let dataset = DatasetPaths::default().load()?;
//! let plan = plan_route(&dataset, &RouteRequest::fastest("1", "7"))?;
//! println!("Route: {} segments", plan.hop_count());
//! ```

mod planner;

pub use planner::{
    select_planner, AlternativePlanner, EcoPlanner, FastestPlanner, RestrictedPlanner,
    RoutePlanner,
};

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::dataset::{Dataset, LocationTable};
use crate::error::Result;
use crate::graph::{Graph, Minutes, TravelMode};
use crate::path::{find_route, find_route_dijkstra, SearchConstraints};

/// Fastest driving route between two locations.
pub fn shortest_path(graph: &Graph, source: &str, dest: &str) -> Vec<String> {
    find_route(graph, source, dest)
}

/// Fastest driving route that honours `constraints`.
///
/// With a `required` location the route is planned as two legs,
/// `source -> required` and `required -> dest`, joined at the shared node.
/// If either leg is impossible the whole route is; no partial route is
/// returned.
pub fn restricted_path(
    graph: &Graph,
    source: &str,
    dest: &str,
    constraints: &SearchConstraints,
    required: Option<&str>,
) -> Vec<String> {
    let Some(required) = required else {
        return find_route_dijkstra(graph, source, dest, TravelMode::Driving, constraints);
    };

    let mut first = find_route_dijkstra(graph, source, required, TravelMode::Driving, constraints);
    let second = find_route_dijkstra(graph, required, dest, TravelMode::Driving, constraints);
    if first.is_empty() || second.is_empty() {
        debug!(source, required, dest, "restricted route: a leg is unreachable");
        return Vec::new();
    }

    first.pop();
    first.extend(second);
    first
}

/// Constraints that keep a route off every interior node and every segment
/// of `main_path`.
///
/// Endpoints stay allowed so the alternative can still leave the source and
/// reach the destination. A path with fewer than two nodes yields no
/// constraints.
pub fn alternative_constraints(main_path: &[String]) -> SearchConstraints {
    let mut constraints = SearchConstraints::new();
    if main_path.len() < 2 {
        return constraints;
    }

    constraints
        .avoided_nodes
        .extend(main_path[1..main_path.len() - 1].iter().cloned());
    for pair in main_path.windows(2) {
        constraints = constraints.avoid_segment(&pair[0], &pair[1]);
    }
    constraints
}

/// Fastest driving route sharing no interior node or segment with
/// `main_path`.
///
/// When avoidance disconnects the graph the result is empty; there is no
/// fallback to a partially overlapping route.
pub fn alternative_path(
    graph: &Graph,
    source: &str,
    dest: &str,
    main_path: &[String],
) -> Vec<String> {
    let constraints = alternative_constraints(main_path);
    find_route_dijkstra(graph, source, dest, TravelMode::Driving, &constraints)
}

/// Total time of `path` in the given mode.
///
/// Parallel edges contribute their cheapest cost for `mode`. Returns `None`
/// when a consecutive pair has no edge usable by `mode` or the sum
/// overflows. Paths with fewer than two nodes cost zero.
pub fn path_cost(graph: &Graph, path: &[String], mode: TravelMode) -> Option<Minutes> {
    path.windows(2).try_fold(0 as Minutes, |total, pair| {
        total.checked_add(graph.segment_cost(&pair[0], &pair[1], mode)?)
    })
}

/// Number of segments in `path`.
pub fn path_length(path: &[String]) -> usize {
    path.len().saturating_sub(1)
}

/// Kind of route a [`RouteRequest`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Fastest driving route.
    #[default]
    Fastest,
    /// Fastest driving route independent of the fastest one.
    Alternative,
    /// Driving route with avoided locations/segments and an optional waypoint.
    Restricted,
    /// Drive to a parking location, then walk.
    Eco,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteKind::Fastest => "fastest",
            RouteKind::Alternative => "alternative",
            RouteKind::Restricted => "restricted",
            RouteKind::Eco => "eco",
        };
        f.write_str(value)
    }
}

/// Constraints applied during route planning, expressed in user terms.
///
/// Locations may be given as ids, codes or names.
#[derive(Debug, Default, Clone)]
pub struct RouteConstraints {
    pub avoid_locations: Vec<String>,
    pub avoid_segments: Vec<(String, String)>,
    /// Location the restricted route must pass through.
    pub include_location: Option<String>,
    /// Walking ceiling for eco routes, in minutes.
    pub max_walk_time: Option<Minutes>,
}

impl RouteConstraints {
    fn to_search_constraints(&self, locations: &LocationTable) -> Result<SearchConstraints> {
        let mut constraints = SearchConstraints::new();
        for name in &self.avoid_locations {
            let location = locations.resolve(name)?;
            constraints = constraints.avoid_node(location.code.clone());
        }
        for (a, b) in &self.avoid_segments {
            let a = locations.resolve(a)?;
            let b = locations.resolve(b)?;
            constraints = constraints.avoid_segment(&a.code, &b.code);
        }
        Ok(constraints)
    }
}

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: String,
    pub goal: String,
    pub kind: RouteKind,
    pub constraints: RouteConstraints,
}

impl RouteRequest {
    /// Fastest driving route without extra constraints.
    pub fn fastest(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            kind: RouteKind::Fastest,
            constraints: RouteConstraints::default(),
        }
    }

    /// Alternative to the fastest driving route.
    pub fn alternative(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            kind: RouteKind::Alternative,
            ..Self::fastest(start, goal)
        }
    }

    /// Restricted driving route.
    pub fn restricted(
        start: impl Into<String>,
        goal: impl Into<String>,
        constraints: RouteConstraints,
    ) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            kind: RouteKind::Restricted,
            constraints,
        }
    }

    /// Eco route with the given walking ceiling.
    pub fn eco(
        start: impl Into<String>,
        goal: impl Into<String>,
        max_walk_time: Minutes,
        constraints: RouteConstraints,
    ) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            kind: RouteKind::Eco,
            constraints: RouteConstraints {
                max_walk_time: Some(max_walk_time),
                ..constraints
            },
        }
    }
}

/// One single-mode stretch of a planned route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteLeg {
    pub mode: TravelMode,
    pub steps: Vec<String>,
    pub time: Option<Minutes>,
}

impl RouteLeg {
    pub fn new(graph: &Graph, mode: TravelMode, steps: Vec<String>) -> Self {
        let time = path_cost(graph, &steps, mode);
        Self { mode, steps, time }
    }

    pub fn hop_count(&self) -> usize {
        path_length(&self.steps)
    }
}

/// Planned route returned by the library. `legs` is empty when no route
/// satisfies the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlan {
    pub kind: RouteKind,
    pub start: String,
    pub goal: String,
    pub legs: Vec<RouteLeg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
    pub message: String,
}

impl RoutePlan {
    /// Plan with a single leg, or no legs when `steps` is empty.
    pub fn single(
        kind: RouteKind,
        graph: &Graph,
        start: &str,
        goal: &str,
        steps: Vec<String>,
    ) -> Self {
        let (legs, message) = if steps.is_empty() {
            (Vec::new(), "No route found.")
        } else {
            (
                vec![RouteLeg::new(graph, TravelMode::Driving, steps)],
                "Route found.",
            )
        };
        Self {
            kind,
            start: start.to_string(),
            goal: goal.to_string(),
            legs,
            parking: None,
            message: message.to_string(),
        }
    }

    pub fn is_found(&self) -> bool {
        !self.legs.is_empty()
    }

    /// Number of segments across all legs.
    pub fn hop_count(&self) -> usize {
        self.legs.iter().map(RouteLeg::hop_count).sum()
    }

    /// Sum of leg times, `None` if nothing was found or a leg is invalid.
    pub fn total_time(&self) -> Option<Minutes> {
        if self.legs.is_empty() {
            return None;
        }
        self.legs
            .iter()
            .try_fold(0 as Minutes, |total, leg| total.checked_add(leg.time?))
    }
}

/// Compute a route for `request` over the dataset.
///
/// Only unknown location names are errors; an impossible route is reported
/// through an empty [`RoutePlan`].
pub fn plan_route(dataset: &Dataset, request: &RouteRequest) -> Result<RoutePlan> {
    let start = dataset.locations.resolve(&request.start)?.code.clone();
    let goal = dataset.locations.resolve(&request.goal)?.code.clone();
    let constraints = request
        .constraints
        .to_search_constraints(&dataset.locations)?;

    let planner = select_planner(request, &dataset.locations)?;
    debug!(
        kind = %planner.kind(),
        start = %start,
        goal = %goal,
        avoided = constraints.avoided_nodes.len(),
        "planning route"
    );

    Ok(planner.plan(&dataset.graph, &start, &goal, &constraints))
}

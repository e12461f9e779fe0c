//! Route planning strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and one implementation per
//! [`RouteKind`]. `plan_route` resolves names and constraints once and then
//! hands the search to whichever planner the request selects.

use crate::dataset::LocationTable;
use crate::eco::eco_route;
use crate::error::{Error, Result};
use crate::graph::{Graph, Minutes, TravelMode};
use crate::path::SearchConstraints;

use super::{
    alternative_path, restricted_path, shortest_path, RouteKind, RouteLeg, RoutePlan,
    RouteRequest,
};

/// Trait for route planning strategies.
pub trait RoutePlanner {
    /// The route kind produced by this planner.
    fn kind(&self) -> RouteKind;

    /// Plan a route between two location codes. Never fails; an impossible
    /// route is an empty plan.
    fn plan(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        constraints: &SearchConstraints,
    ) -> RoutePlan;
}

/// Unconstrained fastest driving route. Request constraints are ignored.
#[derive(Debug, Clone, Default)]
pub struct FastestPlanner;

impl RoutePlanner for FastestPlanner {
    fn kind(&self) -> RouteKind {
        RouteKind::Fastest
    }

    fn plan(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        _constraints: &SearchConstraints,
    ) -> RoutePlan {
        let steps = shortest_path(graph, start, goal);
        RoutePlan::single(self.kind(), graph, start, goal, steps)
    }
}

/// Second, independent driving route derived from the fastest one.
#[derive(Debug, Clone, Default)]
pub struct AlternativePlanner;

impl RoutePlanner for AlternativePlanner {
    fn kind(&self) -> RouteKind {
        RouteKind::Alternative
    }

    fn plan(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        _constraints: &SearchConstraints,
    ) -> RoutePlan {
        let main = shortest_path(graph, start, goal);
        let steps = alternative_path(graph, start, goal, &main);
        RoutePlan::single(self.kind(), graph, start, goal, steps)
    }
}

/// Driving route honouring avoided locations and segments, optionally
/// forced through a waypoint.
#[derive(Debug, Clone, Default)]
pub struct RestrictedPlanner {
    required: Option<String>,
}

impl RestrictedPlanner {
    pub fn new(required: Option<String>) -> Self {
        Self { required }
    }
}

impl RoutePlanner for RestrictedPlanner {
    fn kind(&self) -> RouteKind {
        RouteKind::Restricted
    }

    fn plan(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        constraints: &SearchConstraints,
    ) -> RoutePlan {
        let steps = restricted_path(graph, start, goal, constraints, self.required.as_deref());
        RoutePlan::single(self.kind(), graph, start, goal, steps)
    }
}

/// Drive to the best parking location, then walk.
#[derive(Debug, Clone)]
pub struct EcoPlanner {
    max_walk_time: Minutes,
    parking_candidates: Vec<String>,
}

impl EcoPlanner {
    pub fn new(max_walk_time: Minutes, parking_candidates: Vec<String>) -> Self {
        Self {
            max_walk_time,
            parking_candidates,
        }
    }
}

impl RoutePlanner for EcoPlanner {
    fn kind(&self) -> RouteKind {
        RouteKind::Eco
    }

    fn plan(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        constraints: &SearchConstraints,
    ) -> RoutePlan {
        let route = eco_route(
            graph,
            &self.parking_candidates,
            start,
            goal,
            self.max_walk_time,
            constraints,
        );

        let legs = if route.is_found() {
            vec![
                RouteLeg {
                    mode: TravelMode::Driving,
                    steps: route.drive_path,
                    time: route.drive_time,
                },
                RouteLeg {
                    mode: TravelMode::Walking,
                    steps: route.walk_path,
                    time: route.walk_time,
                },
            ]
        } else {
            Vec::new()
        };

        RoutePlan {
            kind: self.kind(),
            start: start.to_string(),
            goal: goal.to_string(),
            legs,
            parking: route.parking,
            message: route.status.message().to_string(),
        }
    }
}

/// Select the appropriate planner for a given request.
///
/// Waypoints are resolved against `locations`; eco requests must carry a
/// walking ceiling.
pub fn select_planner(
    request: &RouteRequest,
    locations: &LocationTable,
) -> Result<Box<dyn RoutePlanner>> {
    let planner: Box<dyn RoutePlanner> = match request.kind {
        RouteKind::Fastest => Box::new(FastestPlanner),
        RouteKind::Alternative => Box::new(AlternativePlanner),
        RouteKind::Restricted => {
            let required = request
                .constraints
                .include_location
                .as_deref()
                .map(|name| locations.resolve(name).map(|loc| loc.code.clone()))
                .transpose()?;
            Box::new(RestrictedPlanner::new(required))
        }
        RouteKind::Eco => {
            let max_walk_time = request
                .constraints
                .max_walk_time
                .ok_or(Error::MissingField {
                    field: "max_walk_time",
                })?;
            Box::new(EcoPlanner::new(max_walk_time, locations.parking_codes()))
        }
    };
    Ok(planner)
}

//! Drive, park, then walk.
//!
//! An eco route drives from the source to a location with parking and walks
//! the rest of the way. Every parking location is tried as a candidate; the
//! winner minimises total time while keeping the walking leg within a
//! ceiling.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::graph::{Graph, Minutes, TravelMode};
use crate::path::{find_route_dijkstra, SearchConstraints};
use crate::routing::path_cost;

/// Outcome classification of an eco route search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EcoStatus {
    /// A drive/park/walk combination satisfied every constraint.
    Found,
    /// The location table has no parking-capable location at all.
    NoParking,
    /// Parking exists but no candidate satisfied the constraints.
    NoViableRoute,
}

impl EcoStatus {
    pub fn message(self) -> &'static str {
        match self {
            EcoStatus::Found => "Eco route found.",
            EcoStatus::NoParking => "No parking nodes available.",
            EcoStatus::NoViableRoute => "No viable eco route found.",
        }
    }
}

impl fmt::Display for EcoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of [`eco_route`]. Paths are empty unless `status` is `Found`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EcoRoute {
    pub drive_path: Vec<String>,
    pub parking: Option<String>,
    pub walk_path: Vec<String>,
    pub drive_time: Option<Minutes>,
    pub walk_time: Option<Minutes>,
    pub status: EcoStatus,
}

impl EcoRoute {
    fn failed(status: EcoStatus) -> Self {
        Self {
            drive_path: Vec::new(),
            parking: None,
            walk_path: Vec::new(),
            drive_time: None,
            walk_time: None,
            status,
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == EcoStatus::Found
    }

    pub fn total_time(&self) -> Option<Minutes> {
        self.drive_time?.checked_add(self.walk_time?)
    }

    pub fn message(&self) -> &'static str {
        self.status.message()
    }
}

struct Candidate {
    park: String,
    drive_path: Vec<String>,
    walk_path: Vec<String>,
    drive_time: Minutes,
    walk_time: Minutes,
}

impl Candidate {
    fn total(&self) -> Minutes {
        self.drive_time.saturating_add(self.walk_time)
    }

    /// Lower total wins; on equal totals the candidate that walks more wins.
    fn beats(&self, other: &Candidate) -> bool {
        let (total, other_total) = (self.total(), other.total());
        total < other_total || (total == other_total && self.walk_time > other.walk_time)
    }
}

/// Find the best drive/park/walk route between `source` and `dest`.
///
/// `parking_candidates` are evaluated in the order given, which must be the
/// location table order: on a full tie the earliest candidate is kept.
/// Candidates listed in `constraints` as avoided nodes are skipped. Both legs
/// honour `constraints`; the walking leg is searched on walking times and
/// must not exceed `max_walk`.
pub fn eco_route<S: AsRef<str>>(
    graph: &Graph,
    parking_candidates: &[S],
    source: &str,
    dest: &str,
    max_walk: Minutes,
    constraints: &SearchConstraints,
) -> EcoRoute {
    if parking_candidates.is_empty() {
        debug!(source, dest, "eco route: no parking locations");
        return EcoRoute::failed(EcoStatus::NoParking);
    }

    let mut best: Option<Candidate> = None;

    for park in parking_candidates.iter().map(AsRef::as_ref) {
        if constraints.avoided_nodes.contains(park) {
            debug!(park, "eco route: parking candidate is avoided");
            continue;
        }

        let drive_path =
            find_route_dijkstra(graph, source, park, TravelMode::Driving, constraints);
        let walk_path = find_route_dijkstra(graph, park, dest, TravelMode::Walking, constraints);
        if drive_path.is_empty() || walk_path.is_empty() {
            debug!(park, "eco route: candidate unreachable");
            continue;
        }

        let (Some(drive_time), Some(walk_time)) = (
            path_cost(graph, &drive_path, TravelMode::Driving),
            path_cost(graph, &walk_path, TravelMode::Walking),
        ) else {
            continue;
        };

        if walk_time > max_walk {
            debug!(park, walk_time, max_walk, "eco route: walk exceeds ceiling");
            continue;
        }

        let candidate = Candidate {
            park: park.to_string(),
            drive_path,
            walk_path,
            drive_time,
            walk_time,
        };
        debug!(
            park,
            drive_time,
            walk_time,
            total = candidate.total(),
            "eco route: viable candidate"
        );

        if best.as_ref().map_or(true, |current| candidate.beats(current)) {
            best = Some(candidate);
        }
    }

    match best {
        Some(winner) => EcoRoute {
            drive_path: winner.drive_path,
            parking: Some(winner.park),
            walk_path: winner.walk_path,
            drive_time: Some(winner.drive_time),
            walk_time: Some(winner.walk_time),
            status: EcoStatus::Found,
        },
        None => EcoRoute::failed(EcoStatus::NoViableRoute),
    }
}

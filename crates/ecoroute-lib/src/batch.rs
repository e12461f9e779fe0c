//! Line-oriented batch requests.
//!
//! A batch file carries one request written as `Key:value` directives with
//! external location ids:
//!
//! ```text
//! Mode:driving-walking
//! Source:8
//! Destination:5
//! MaxWalkTime:18
//! AvoidNodes:14
//! AvoidSegments:(1,2),(3,4)
//! ```
//!
//! Unrecognised lines are ignored, as are optional directives with an empty
//! value.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::dataset::{Dataset, LocationId};
use crate::eco::eco_route;
use crate::error::{Error, Result};
use crate::graph::{Minutes, TravelMode};
use crate::output::{BatchReport, RouteSummary};
use crate::path::SearchConstraints;
use crate::routing::{alternative_path, restricted_path, shortest_path};

/// Operation requested by a batch file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchMode {
    /// Fastest plus independent alternative driving route.
    Driving,
    /// Driving route with avoided locations/segments and an optional waypoint.
    DrivingRestricted,
    /// Drive to parking, then walk.
    DrivingWalking,
}

impl FromStr for BatchMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "driving" => Ok(BatchMode::Driving),
            "driving-restricted" => Ok(BatchMode::DrivingRestricted),
            "driving-walking" => Ok(BatchMode::DrivingWalking),
            other => Err(Error::UnsupportedBatchMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            BatchMode::Driving => "driving",
            BatchMode::DrivingRestricted => "driving-restricted",
            BatchMode::DrivingWalking => "driving-walking",
        };
        f.write_str(value)
    }
}

/// Parsed batch request, still in external ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub mode: BatchMode,
    pub source: LocationId,
    pub destination: LocationId,
    pub include_node: Option<LocationId>,
    pub max_walk_time: Option<Minutes>,
    pub avoid_nodes: BTreeSet<LocationId>,
    pub avoid_segments: Vec<(LocationId, LocationId)>,
}

impl BatchRequest {
    /// Read and parse a batch file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let input = fs::read_to_string(path)?;
        Self::parse(&input)
    }

    /// Parse batch directives from text.
    pub fn parse(input: &str) -> Result<Self> {
        let mut mode = None;
        let mut source = None;
        let mut destination = None;
        let mut include_node = None;
        let mut max_walk_time = None;
        let mut avoid_nodes = BTreeSet::new();
        let mut avoid_segments = Vec::new();

        for (index, raw) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim_end_matches('\r');

            let Some((key, value)) = line.split_once(':') else {
                if !line.trim().is_empty() {
                    debug!(line = line_no, content = line, "ignoring batch line");
                }
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "Mode" => mode = Some(value.parse::<BatchMode>()?),
                "Source" => source = Some(parse_number(value, line_no)?),
                "Destination" => destination = Some(parse_number(value, line_no)?),
                "IncludeNode" if !value.is_empty() => {
                    include_node = Some(parse_number(value, line_no)?)
                }
                "MaxWalkTime" if !value.is_empty() => {
                    max_walk_time = Some(parse_number(value, line_no)?)
                }
                "AvoidNodes" => {
                    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                        avoid_nodes.insert(parse_number(token, line_no)?);
                    }
                }
                "AvoidSegments" => avoid_segments.extend(parse_segments(value, line_no)?),
                "IncludeNode" | "MaxWalkTime" => {}
                other => debug!(line = line_no, key = other, "ignoring batch directive"),
            }
        }

        let mode = mode.ok_or(Error::MissingField { field: "Mode" })?;
        if mode == BatchMode::DrivingWalking && max_walk_time.is_none() {
            return Err(Error::MissingField {
                field: "MaxWalkTime",
            });
        }

        Ok(Self {
            mode,
            source: source.ok_or(Error::MissingField { field: "Source" })?,
            destination: destination.ok_or(Error::MissingField {
                field: "Destination",
            })?,
            include_node,
            max_walk_time,
            avoid_nodes,
            avoid_segments,
        })
    }
}

fn parse_number<T: FromStr>(value: &str, line: usize) -> Result<T>
where
    T::Err: fmt::Display,
{
    value.parse::<T>().map_err(|e| Error::Batch {
        line,
        message: format!("invalid number '{}': {}", value, e),
    })
}

/// Parse `(a,b),(c,d)` into id pairs.
fn parse_segments(value: &str, line: usize) -> Result<Vec<(LocationId, LocationId)>> {
    let mut segments = Vec::new();
    for chunk in value.split(')') {
        let Some(open) = chunk.find('(') else {
            continue;
        };
        let inner = &chunk[open + 1..];
        let Some((a, b)) = inner.split_once(',') else {
            return Err(Error::Batch {
                line,
                message: format!("malformed segment '({})'", inner),
            });
        };
        segments.push((parse_number(a.trim(), line)?, parse_number(b.trim(), line)?));
    }
    Ok(segments)
}

/// Translate the avoided ids of a request into search constraints.
fn resolve_constraints(dataset: &Dataset, request: &BatchRequest) -> Result<SearchConstraints> {
    let locations = &dataset.locations;
    let mut constraints = SearchConstraints::new();
    for &id in &request.avoid_nodes {
        constraints = constraints.avoid_node(locations.require_code(id)?);
    }
    for &(a, b) in &request.avoid_segments {
        constraints =
            constraints.avoid_segment(locations.require_code(a)?, locations.require_code(b)?);
    }
    debug!(
        avoided_nodes = constraints.avoided_nodes.len(),
        avoided_segments = constraints.avoided_segments.len(),
        "resolved batch constraints"
    );
    Ok(constraints)
}

/// Execute a batch request against the dataset.
///
/// Every id the requested mode uses must exist in the location table.
/// Directives the mode ignores are not checked. Impossible routes are part of
/// the report, not errors.
pub fn run_batch(dataset: &Dataset, request: &BatchRequest) -> Result<BatchReport> {
    let locations = &dataset.locations;
    let graph = &dataset.graph;

    let source = locations.require_code(request.source)?;
    let destination = locations.require_code(request.destination)?;

    debug!(mode = %request.mode, source, destination, "running batch request");

    let summary = |path: &[String], mode: TravelMode| {
        RouteSummary::from_path(locations, graph, path, mode)
    };

    let report = match request.mode {
        BatchMode::Driving => {
            let best = shortest_path(graph, source, destination);
            let alternative = alternative_path(graph, source, destination, &best);
            BatchReport::Driving {
                source: request.source,
                destination: request.destination,
                best: summary(&best, TravelMode::Driving),
                alternative: summary(&alternative, TravelMode::Driving),
            }
        }
        BatchMode::DrivingRestricted => {
            let constraints = resolve_constraints(dataset, request)?;
            let include = request
                .include_node
                .map(|id| locations.require_code(id))
                .transpose()?;
            let route = restricted_path(graph, source, destination, &constraints, include);
            BatchReport::DrivingRestricted {
                source: request.source,
                destination: request.destination,
                route: summary(&route, TravelMode::Driving),
            }
        }
        BatchMode::DrivingWalking => {
            let max_walk = request.max_walk_time.ok_or(Error::MissingField {
                field: "MaxWalkTime",
            })?;
            let constraints = resolve_constraints(dataset, request)?;
            let parking = locations.parking_codes();
            let eco = eco_route(graph, &parking, source, destination, max_walk, &constraints);
            let parking_id = eco
                .parking
                .as_deref()
                .and_then(|code| locations.id_for_code(code));
            BatchReport::DrivingWalking {
                source: request.source,
                destination: request.destination,
                driving: summary(&eco.drive_path, TravelMode::Driving),
                parking: parking_id,
                walking: summary(&eco.walk_path, TravelMode::Walking),
                total_time: eco.total_time(),
                message: eco.message().to_string(),
            }
        }
    };

    Ok(report)
}

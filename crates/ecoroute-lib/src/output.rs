use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::dataset::{LocationId, LocationTable};
use crate::error::Result;
use crate::graph::{Graph, Minutes, TravelMode};
use crate::routing::path_cost;

/// A route expressed in external location ids with its total time.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteSummary {
    pub steps: Vec<LocationId>,
    pub time: Option<Minutes>,
}

impl RouteSummary {
    /// Translate a path of codes into ids. Empty paths yield `None`.
    pub fn from_path(
        locations: &LocationTable,
        graph: &Graph,
        path: &[String],
        mode: TravelMode,
    ) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self {
            steps: ids_for_codes(locations, path),
            time: path_cost(graph, path, mode),
        })
    }

    /// `1,2,3(10)` as written in batch output.
    pub fn to_line(&self) -> String {
        format_route(&self.steps, self.time)
    }
}

/// Id written for a code that only appears in the distances table.
pub const UNKNOWN_ID: LocationId = -1;

/// Translate location codes into their external ids.
///
/// Codes missing from the location table become [`UNKNOWN_ID`].
pub fn ids_for_codes(locations: &LocationTable, path: &[String]) -> Vec<LocationId> {
    path.iter()
        .map(|code| locations.id_for_code(code).unwrap_or(UNKNOWN_ID))
        .collect()
}

/// Comma-separated ids followed by the time in parentheses.
///
/// An invalid time is rendered as `-1`, the value the batch format has always
/// used for it.
pub fn format_route(steps: &[LocationId], time: Option<Minutes>) -> String {
    let mut line = steps
        .iter()
        .map(LocationId::to_string)
        .collect::<Vec<_>>()
        .join(",");
    match time {
        Some(time) => {
            let _ = write!(line, "({time})");
        }
        None => line.push_str("(-1)"),
    }
    line
}

fn route_or_none(route: Option<&RouteSummary>) -> String {
    route
        .map(RouteSummary::to_line)
        .unwrap_or_else(|| "none".to_string())
}

/// Result of a batch run, ready to be rendered or serialised.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum BatchReport {
    /// Fastest and alternative driving routes.
    Driving {
        source: LocationId,
        destination: LocationId,
        best: Option<RouteSummary>,
        alternative: Option<RouteSummary>,
    },
    /// Restricted driving route.
    DrivingRestricted {
        source: LocationId,
        destination: LocationId,
        route: Option<RouteSummary>,
    },
    /// Drive, park and walk.
    DrivingWalking {
        source: LocationId,
        destination: LocationId,
        driving: Option<RouteSummary>,
        parking: Option<LocationId>,
        walking: Option<RouteSummary>,
        total_time: Option<Minutes>,
        message: String,
    },
}

impl BatchReport {
    pub fn source(&self) -> LocationId {
        match self {
            BatchReport::Driving { source, .. }
            | BatchReport::DrivingRestricted { source, .. }
            | BatchReport::DrivingWalking { source, .. } => *source,
        }
    }

    pub fn destination(&self) -> LocationId {
        match self {
            BatchReport::Driving { destination, .. }
            | BatchReport::DrivingRestricted { destination, .. }
            | BatchReport::DrivingWalking { destination, .. } => *destination,
        }
    }

    /// Render the report in the line-oriented batch output format.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Source:{}", self.source());
        let _ = writeln!(out, "Destination:{}", self.destination());

        match self {
            BatchReport::Driving {
                best, alternative, ..
            } => {
                let _ = writeln!(out, "BestDrivingRoute:{}", route_or_none(best.as_ref()));
                let _ = writeln!(
                    out,
                    "AlternativeDrivingRoute:{}",
                    route_or_none(alternative.as_ref())
                );
            }
            BatchReport::DrivingRestricted { route, .. } => {
                let _ = writeln!(
                    out,
                    "RestrictedDrivingRoute:{}",
                    route_or_none(route.as_ref())
                );
            }
            BatchReport::DrivingWalking {
                driving,
                parking,
                walking,
                total_time,
                message,
                ..
            } => match (driving, parking, walking) {
                (Some(driving), Some(parking), Some(walking)) => {
                    let _ = writeln!(out, "DrivingRoute:{}", driving.to_line());
                    let _ = writeln!(out, "ParkingNode:{}", parking);
                    let _ = writeln!(out, "WalkingRoute:{}", walking.to_line());
                    let total = total_time.map(|t| t.to_string()).unwrap_or_default();
                    let _ = writeln!(out, "TotalTime:{}", total);
                }
                _ => {
                    out.push_str("DrivingRoute:none\n");
                    out.push_str("ParkingNode:none\n");
                    out.push_str("WalkingRoute:none\n");
                    out.push_str("TotalTime:\n");
                    let _ = writeln!(out, "Message:{}", message);
                }
            },
        }

        out
    }

    /// Write the rendered report to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render_text())?;
        Ok(())
    }
}

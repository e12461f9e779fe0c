//! Location and distance tables.
//!
//! The routing core only knows location codes. This module owns the
//! boundary data: the ordered location table (ids, names, codes and parking
//! flags) and the edge list used to build the [`Graph`].

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::{build_graph, Graph, Minutes};

/// Marker used in the distances table for a mode that cannot use an edge.
pub const UNAVAILABLE_MARKER: &str = "X";

/// External integer identifier of a location.
pub type LocationId = i64;

/// A named place in the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub code: String,
    pub has_parking: bool,
}

/// One row of the distances table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub driving: Option<Minutes>,
    pub walking: Option<Minutes>,
}

/// Ordered collection of locations with id and code lookups.
///
/// Table order is preserved because eco routing evaluates parking
/// candidates in that order.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    locations: Vec<Location>,
    by_code: HashMap<String, usize>,
    by_id: HashMap<LocationId, usize>,
}

impl LocationTable {
    /// Build a table, rejecting duplicate ids or codes.
    pub fn new(locations: Vec<Location>) -> Result<Self> {
        let mut by_code = HashMap::with_capacity(locations.len());
        let mut by_id = HashMap::with_capacity(locations.len());

        for (index, location) in locations.iter().enumerate() {
            if by_code.insert(location.code.clone(), index).is_some() {
                return Err(Error::DuplicateLocation {
                    field: "code",
                    value: location.code.clone(),
                });
            }
            if by_id.insert(location.id, index).is_some() {
                return Err(Error::DuplicateLocation {
                    field: "id",
                    value: location.id.to_string(),
                });
            }
        }

        Ok(Self {
            locations,
            by_code,
            by_id,
        })
    }

    /// Load the locations table from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), locations = table.len(), "loaded locations");
        Ok(table)
    }

    /// Load the locations table from CSV with a `Location,Id,Code,Parking` header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let mut locations = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let row = record_row(&record);

            let field = |index: usize, name: &str| -> Result<String> {
                record
                    .get(index)
                    .map(str::to_string)
                    .ok_or_else(|| Error::InvalidLocation {
                        row,
                        message: format!("missing {name} column"),
                    })
            };

            let name = field(0, "name")?;
            let id = field(1, "id")?
                .parse::<LocationId>()
                .map_err(|e| Error::InvalidLocation {
                    row,
                    message: format!("invalid id for '{}': {}", name, e),
                })?;
            let code = clean_code(&field(2, "code")?);
            if code.is_empty() {
                return Err(Error::InvalidLocation {
                    row,
                    message: format!("empty code for '{}'", name),
                });
            }
            let has_parking = record.get(3).map(is_parking_flag).unwrap_or(false);

            locations.push(Location {
                id,
                name,
                code,
                has_parking,
            });
        }

        Self::new(locations)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }

    pub fn get_by_id(&self, id: LocationId) -> Option<&Location> {
        self.by_id.get(&id).map(|&index| &self.locations[index])
    }

    pub fn get_by_code(&self, code: &str) -> Option<&Location> {
        self.by_code.get(code).map(|&index| &self.locations[index])
    }

    pub fn code_for_id(&self, id: LocationId) -> Option<&str> {
        self.get_by_id(id).map(|location| location.code.as_str())
    }

    pub fn id_for_code(&self, code: &str) -> Option<LocationId> {
        self.get_by_code(code).map(|location| location.id)
    }

    /// Codes of every location with parking, in table order.
    pub fn parking_codes(&self) -> Vec<String> {
        self.locations
            .iter()
            .filter(|location| location.has_parking)
            .map(|location| location.code.clone())
            .collect()
    }

    /// Translate an external id into its code.
    pub fn require_code(&self, id: LocationId) -> Result<&str> {
        self.code_for_id(id).ok_or(Error::UnknownLocationId { id })
    }

    /// Resolve user input (an id, a code or a name) to a location.
    ///
    /// Unknown input produces [`Error::UnknownLocation`] with fuzzy suggestions.
    pub fn resolve(&self, token: &str) -> Result<&Location> {
        let token = token.trim();
        if let Ok(id) = token.parse::<LocationId>() {
            if let Some(location) = self.get_by_id(id) {
                return Ok(location);
            }
        }

        if let Some(location) = self.get_by_code(&clean_code(token)) {
            return Ok(location);
        }

        if let Some(location) = self
            .locations
            .iter()
            .find(|location| location.name.eq_ignore_ascii_case(token))
        {
            return Ok(location);
        }

        Err(Error::UnknownLocation {
            name: token.to_string(),
            suggestions: self.fuzzy_matches(token, 3),
        })
    }

    /// Location codes most similar to `query`, best match first.
    pub fn fuzzy_matches(&self, query: &str, limit: usize) -> Vec<String> {
        const MIN_SIMILARITY: f64 = 0.75;

        let needle = query.to_ascii_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .locations
            .iter()
            .map(|location| {
                let by_code = strsim::jaro_winkler(&needle, &location.code.to_ascii_lowercase());
                let by_name = strsim::jaro_winkler(&needle, &location.name.to_ascii_lowercase());
                (by_code.max(by_name), location.code.as_str())
            })
            .filter(|(score, _)| *score >= MIN_SIMILARITY)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, code)| code.to_string())
            .collect()
    }
}

/// Load the distances table from a CSV file.
pub fn load_edges_from_path(path: &Path) -> Result<Vec<EdgeRecord>> {
    let file = fs::File::open(path)?;
    let edges = load_edges_from_reader(file)?;
    debug!(path = %path.display(), edges = edges.len(), "loaded distances");
    Ok(edges)
}

/// Load distances from CSV with a `Location1,Location2,Driving,Walking` header.
///
/// A cost of `X` marks the mode as unavailable for that edge.
pub fn load_edges_from_reader<R: Read>(reader: R) -> Result<Vec<EdgeRecord>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut edges = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let row = record_row(&record);

        let endpoint = |index: usize, name: &str| -> Result<String> {
            let code = record.get(index).map(clean_code).unwrap_or_default();
            if code.is_empty() {
                return Err(Error::InvalidEdge {
                    row,
                    message: format!("missing {name} location"),
                });
            }
            Ok(code)
        };

        let from = endpoint(0, "first")?;
        let to = endpoint(1, "second")?;
        let driving = parse_cost(record.get(2), row, "driving")?;
        let walking = parse_cost(record.get(3), row, "walking")?;

        edges.push(EdgeRecord {
            from,
            to,
            driving,
            walking,
        });
    }

    Ok(edges)
}

fn parse_cost(value: Option<&str>, row: u64, mode: &str) -> Result<Option<Minutes>> {
    let Some(value) = value else {
        return Err(Error::InvalidEdge {
            row,
            message: format!("missing {mode} time"),
        });
    };

    if value.eq_ignore_ascii_case(UNAVAILABLE_MARKER) {
        return Ok(None);
    }

    value
        .parse::<Minutes>()
        .map(Some)
        .map_err(|e| Error::InvalidEdge {
            row,
            message: format!("invalid {mode} time '{}': {}", value, e),
        })
}

fn record_row(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}

fn is_parking_flag(value: &str) -> bool {
    value.trim() == "1"
}

/// Strip spaces from a location code.
pub fn clean_code(code: &str) -> String {
    code.chars().filter(|c| *c != ' ').collect()
}

/// Locations, edges and the graph built from them.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub locations: LocationTable,
    pub edges: Vec<EdgeRecord>,
    pub graph: Graph,
}

impl Dataset {
    /// Combine a location table and edge list, building the graph.
    pub fn from_parts(locations: LocationTable, edges: Vec<EdgeRecord>) -> Self {
        for edge in &edges {
            if edge.driving.is_none() && edge.walking.is_none() {
                warn!(from = %edge.from, to = %edge.to, "edge is unusable by any mode");
            }
            for code in [&edge.from, &edge.to] {
                if locations.get_by_code(code).is_none() {
                    warn!(code = %code, "edge references a location missing from the table");
                }
            }
        }

        let graph = build_graph(&edges);
        Self {
            locations,
            edges,
            graph,
        }
    }

    /// Load both tables from disk.
    pub fn load(locations_path: &Path, distances_path: &Path) -> Result<Self> {
        let locations = LocationTable::from_path(locations_path)?;
        let edges = load_edges_from_path(distances_path)?;
        let dataset = Self::from_parts(locations, edges);
        info!(
            locations = dataset.locations.len(),
            segments = dataset.edges.len(),
            nodes = dataset.graph.node_count(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

/// Paths to the two input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub locations: PathBuf,
    pub distances: PathBuf,
}

impl DatasetPaths {
    pub fn new(locations: impl Into<PathBuf>, distances: impl Into<PathBuf>) -> Self {
        Self {
            locations: locations.into(),
            distances: distances.into(),
        }
    }

    /// Load the dataset these paths point at.
    pub fn load(&self) -> Result<Dataset> {
        Dataset::load(&self.locations, &self.distances)
    }
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self::new("Locations.csv", "Distances.csv")
    }
}

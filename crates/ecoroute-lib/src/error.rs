use thiserror::Error;

/// Convenient result alias for the ecoroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Route searches never produce these; they only surface while loading
/// datasets, parsing batch files or resolving user-supplied identifiers.
#[derive(Debug, Error)]
pub enum Error {
    /// A row in the locations table could not be parsed.
    #[error("invalid location at row {row}: {message}")]
    InvalidLocation { row: u64, message: String },

    /// A row in the distances table could not be parsed.
    #[error("invalid edge at row {row}: {message}")]
    InvalidEdge { row: u64, message: String },

    /// Raised when two locations share an id or a code.
    #[error("duplicate location {field}: {value}")]
    DuplicateLocation { field: &'static str, value: String },

    /// Raised when a location name or code could not be found in the table.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when an external integer id has no matching location.
    #[error("unknown location id: {id}")]
    UnknownLocationId { id: i64 },

    /// Raised when a batch file line could not be parsed.
    #[error("invalid batch input at line {line}: {message}")]
    Batch { line: usize, message: String },

    /// Raised when a request or batch file omits a value its mode needs.
    #[error("missing required field {field}")]
    MissingField { field: &'static str },

    /// Raised when a batch file requests an unknown mode.
    #[error("batch mode {mode:?} is not supported")]
    UnsupportedBatchMode { mode: String },

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

// Handlers for the CLI subcommands.
//
// main.rs parses arguments and loads the dataset, then dispatches to these
// handlers. The interactive menu reuses the same planning functions.

pub mod batch;
pub mod route;

/// Parse an `A:B` (or `A,B`) location pair for `--avoid-segment`.
pub fn parse_segment(value: &str) -> Result<(String, String), String> {
    let (a, b) = value
        .split_once(':')
        .or_else(|| value.split_once(','))
        .ok_or_else(|| format!("expected a segment as A:B, got '{}'", value))?;
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return Err(format!("segment '{}' has an empty endpoint", value));
    }
    Ok((a.to_string(), b.to_string()))
}

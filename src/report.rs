//! Console rendering of the List Containers response.

use bytes::Bytes;
use serde_json::Value;

use std::io::{self, Write};

use crate::container::ContainerSummary;
use crate::errors::Error;

/// Printed when the response carries no containers.
pub const NO_CONTAINERS: &str = "No running containers found.";

/// Printed before the container lines.
pub const HEADER: &str = "Running Containers:";

/// Printed when no usable data came back from the daemon.
pub const FAILURE: &str =
    "Failed to get container information. Is the Docker daemon running and accessible?";

/// Which branch [render] took.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Report {
    /// The request failed or the body was not a JSON array.
    Failed,
    /// The daemon returned an empty array.
    Empty,
    /// The daemon returned containers; `skipped` counts malformed entries.
    Listed {
        /// Number of container lines written.
        shown: usize,
        /// Number of entries left out because a field was missing or mistyped.
        skipped: usize,
    },
}

/// Parse a List Containers response body into its array elements.
///
/// Fails with [JsonParseError](Error::JsonParseError) when the body is not JSON and with
/// [JsonShapeError](Error::JsonShapeError) when it is JSON of another shape, such as the error
/// object the daemon sends on failure.
pub fn parse_container_list(body: &[u8]) -> Result<Vec<Value>, Error> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(elements) => Ok(elements),
        other => Err(Error::JsonShapeError {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Write the outcome of a List Containers request to `out`, with diagnostics on `err`.
///
/// Malformed container entries are skipped with a warning; the rest are still listed.
pub fn render<O, E>(outcome: Result<Bytes, Error>, out: &mut O, err: &mut E) -> io::Result<Report>
where
    O: Write,
    E: Write,
{
    let elements = match outcome.and_then(|body| parse_container_list(&body)) {
        Ok(elements) => elements,
        Err(e) => {
            let category = match e {
                Error::JsonParseError { .. } => "JSON parsing failed",
                Error::JsonShapeError { .. } => "Unexpected response from Docker",
                _ => "Docker request failed",
            };
            writeln!(err, "{category}: {e}")?;
            writeln!(out, "{FAILURE}")?;
            return Ok(Report::Failed);
        }
    };

    if elements.is_empty() {
        writeln!(out, "{NO_CONTAINERS}")?;
        return Ok(Report::Empty);
    }

    writeln!(out, "{HEADER}")?;

    let mut shown = 0;
    let mut skipped = 0;
    for (index, element) in elements.iter().enumerate() {
        match ContainerSummary::from_value(index, element) {
            Ok(container) => {
                writeln!(
                    out,
                    "  - ID: {}, Name: {}, Image: {}",
                    container.short_id(),
                    container.display_name(),
                    container.image
                )?;
                shown += 1;
            }
            Err(e) => {
                debug!("{}", e);
                writeln!(err, "Skipping container entry {index}: {e}")?;
                skipped += 1;
            }
        }
    }

    Ok(Report::Listed { shown, skipped })
}

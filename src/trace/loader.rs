use std::path::Path;

use crate::error::TraceError;

use super::Trace;

/// Reads a HAR file from disk.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a HAR document.
pub fn load_trace(path: &Path) -> Result<Trace, TraceError> {
    let content = std::fs::read(path).map_err(|err| TraceError::ReadTrace {
        path: path.to_path_buf(),
        source: err,
    })?;
    parse_trace(&content).map_err(|err| TraceError::ParseTrace {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Parses either a full HAR document (`{"log": {...}}`) or a bare log object.
///
/// # Errors
///
/// Returns the JSON error when the document does not match the HAR shape.
pub fn parse_trace(content: &[u8]) -> Result<Trace, serde_json::Error> {
    let mut document: serde_json::Value = serde_json::from_slice(content)?;
    let log = match document
        .as_object_mut()
        .and_then(|object| object.remove("log"))
    {
        Some(log) => log,
        None => document,
    };
    serde_json::from_value(log)
}

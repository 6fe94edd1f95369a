//! Field path syntax, shared by metadata flattening, data rehydration, and
//! CSV export.
//!
//! Object keys join with `.`; an array index appends `[i]` directly to its
//! key with no separator, e.g. `safety_criteria[2].standard_value.value`.
//! Printing and parsing live here and nowhere else, because the flattened metadata
//! map and the data tree are looked up jointly by these strings, so the two
//! sides must never drift.

use thiserror::Error;

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Plain object key.
    Key(String),
    /// Object key whose value is an array, entered at `index`.
    Index { key: String, index: usize },
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Empty field path")]
    Empty,

    #[error("Malformed path segment '{0}'")]
    Malformed(String),
}

/// Append an object key to a path prefix.
pub fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Append an array index to a path.
pub fn join_index(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Parse a path string into segments. Empty segments (from stray dots) are
/// skipped; a malformed index is an error rather than a silent miss.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let mut segments = Vec::new();
    for part in path.split('.').filter(|p| !p.is_empty()) {
        match part.find('[') {
            None => segments.push(PathSegment::Key(part.to_string())),
            Some(bracket) => {
                let key = &part[..bracket];
                let index = part[bracket + 1..]
                    .strip_suffix(']')
                    .and_then(|s| s.parse::<usize>().ok())
                    .ok_or_else(|| PathError::Malformed(part.to_string()))?;
                if key.is_empty() {
                    return Err(PathError::Malformed(part.to_string()));
                }
                segments.push(PathSegment::Index {
                    key: key.to_string(),
                    index,
                });
            }
        }
    }
    if segments.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(segments)
}

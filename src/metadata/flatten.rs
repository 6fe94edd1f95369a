//! Flattening of the nested metadata envelope into a path-keyed map.
//!
//! The extraction response delivers per-field confidence and location as a
//! nested tree parallel to the extracted data. The viewer looks fields up by
//! path string, so the tree is flattened once per extraction and read-only
//! after that; the next extraction replaces the whole map.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::path::{join_index, join_key};
use super::types::FieldMetadata;

/// Flat path → metadata lookup table for one extraction result.
pub type MetadataMap = BTreeMap<String, FieldMetadata>;

/// The wrapper key marking a metadata leaf.
const VALUE_MARKER: &str = "_value";

/// Flatten a metadata envelope into a path-keyed map.
///
/// Object values carrying the `_value` marker are leaves; arrays are walked
/// by index with `[i]` appended to the path; other objects recurse. Scalars
/// carry no metadata and are skipped, as are leaves that fail to parse; a
/// partially usable envelope is better than none.
pub fn flatten_metadata(envelope: &Value) -> MetadataMap {
    let mut map = MetadataMap::new();
    if let Some(obj) = envelope.as_object() {
        flatten_object(obj, "", &mut map);
    }
    map
}

fn flatten_object(obj: &Map<String, Value>, prefix: &str, out: &mut MetadataMap) {
    for (key, value) in obj {
        let path = join_key(prefix, key);
        match value {
            Value::Object(child) if child.contains_key(VALUE_MARKER) => {
                record_leaf(path, value, out);
            }
            Value::Object(child) => flatten_object(child, &path, out),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let item_path = join_index(&path, index);
                    match item {
                        Value::Object(child) if child.contains_key(VALUE_MARKER) => {
                            record_leaf(item_path, item, out);
                        }
                        Value::Object(child) => flatten_object(child, &item_path, out),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}

fn record_leaf(path: String, value: &Value, out: &mut MetadataMap) {
    match serde_json::from_value::<FieldMetadata>(value.clone()) {
        Ok(meta) => {
            out.insert(path, meta);
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Skipping unparseable metadata leaf");
        }
    }
}

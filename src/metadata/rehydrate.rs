//! Path-addressed writes back into the extracted data tree.
//!
//! User corrections arrive as (path, new value) pairs keyed by the same
//! syntax the metadata map uses. The tree is treated as immutable from the
//! caller's side: every edit produces a new tree value.

use serde_json::{Map, Value};

use super::path::{parse_path, PathError, PathSegment};

/// Set a leaf in the data tree, returning the updated tree.
///
/// Missing intermediate containers are created on demand: objects for key
/// segments, arrays (null-padded up to the index) for indexed segments. The
/// input tree is never mutated.
pub fn set_value_at_path(tree: &Value, path: &str, new_value: Value) -> Result<Value, PathError> {
    let segments = parse_path(path)?;
    let mut updated = tree.clone();
    write_segments(&mut updated, &segments, new_value);
    Ok(updated)
}

fn write_segments(node: &mut Value, segments: &[PathSegment], value: Value) {
    let Some((head, tail)) = segments.split_first() else {
        return;
    };
    match head {
        PathSegment::Key(key) => {
            let obj = ensure_object(node);
            if tail.is_empty() {
                obj.insert(key.clone(), value);
            } else {
                let child = obj.entry(key.clone()).or_insert(Value::Null);
                write_segments(child, tail, value);
            }
        }
        PathSegment::Index { key, index } => {
            let obj = ensure_object(node);
            let slot = obj.entry(key.clone()).or_insert_with(|| Value::Array(Vec::new()));
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            let arr = slot.as_array_mut().expect("slot was just made an array");
            if arr.len() <= *index {
                arr.resize(*index + 1, Value::Null);
            }
            if tail.is_empty() {
                arr[*index] = value;
            } else {
                write_segments(&mut arr[*index], tail, value);
            }
        }
    }
}

/// Make the node an object so a key segment can descend into it, replacing
/// whatever scalar or null was there.
fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node.as_object_mut().expect("node was just made an object")
}

//! Schema validation against the extraction API's structural constraints.
//!
//! The API accepts a restricted JSON-Schema dialect: the root is an object,
//! `object` nodes may appear only as array items (never as a property value,
//! at any depth), and arrays may not nest directly. Violations are collected
//! exhaustively rather than failing fast, so the caller can show every
//! problem at once.

use serde_json::{Map, Value};

/// API constraints on extraction schemas.
pub mod limits {
    /// Maximum number of named properties across the whole schema.
    pub const MAX_PROPERTY_COUNT: usize = 100;

    /// Maximum combined character length of all property names.
    pub const MAX_PROPERTY_NAME_CHARS: usize = 10_000;

    /// Soft cap on serialized schema size. Exceeding it is a warning, not an
    /// error; the API may still accept the request.
    pub const MAX_SCHEMA_CHARS: usize = 15_000;
}

/// Outcome of schema validation: blocking errors and advisory warnings,
/// in document order of traversal.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate a candidate extraction schema.
///
/// Errors block the extraction request; warnings do not. The output order is
/// deterministic: depth-first over `properties` in insertion order, each
/// offending object reported before its own children, aggregate limits last.
pub fn validate_schema(schema: &Value) -> SchemaValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let root_props = schema
        .get("properties")
        .and_then(Value::as_object)
        .filter(|props| !props.is_empty());

    let is_object_root = schema.get("type").and_then(Value::as_str) == Some("object");

    let Some(props) = root_props.filter(|_| is_object_root) else {
        errors.push(
            "Root schema must have type \"object\" with at least one property".to_string(),
        );
        return SchemaValidation {
            valid: false,
            errors,
            warnings,
        };
    };

    let mut budget = NameBudget::default();
    walk_properties(props, "", &mut errors, &mut budget);

    if budget.count > limits::MAX_PROPERTY_COUNT {
        errors.push(format!(
            "Schema defines {} properties; the API allows at most {}",
            budget.count,
            limits::MAX_PROPERTY_COUNT
        ));
    }
    if budget.chars > limits::MAX_PROPERTY_NAME_CHARS {
        errors.push(format!(
            "Property names total {} characters; the API allows at most {}",
            budget.chars,
            limits::MAX_PROPERTY_NAME_CHARS
        ));
    }

    let serialized_len = schema.to_string().chars().count();
    if serialized_len > limits::MAX_SCHEMA_CHARS {
        warnings.push(format!(
            "Serialized schema is {serialized_len} characters; sizes above {} may be rejected by the API",
            limits::MAX_SCHEMA_CHARS
        ));
    }

    SchemaValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Running totals for the aggregate property limits.
#[derive(Debug, Default)]
struct NameBudget {
    count: usize,
    chars: usize,
}

/// Recurse over a `properties` map. `prefix` is the dotted path of the
/// enclosing node; array-item context carries a `[]` suffix.
fn walk_properties(
    props: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<String>,
    budget: &mut NameBudget,
) {
    for (name, def) in props {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };

        budget.count += 1;
        budget.chars += name.chars().count();

        match def.get("type").and_then(Value::as_str) {
            Some("object") => {
                errors.push(format!(
                    "Property '{path}' is an object. The API does not accept nested objects \
                     as properties; flatten its fields or wrap it in an array"
                ));
                // Still descend: deeper violations and name totals must be reported.
                if let Some(children) = def.get("properties").and_then(Value::as_object) {
                    walk_properties(children, &path, errors, budget);
                }
            }
            Some("array") => {
                let Some(items) = def.get("items") else {
                    continue;
                };
                match items.get("type").and_then(Value::as_str) {
                    Some("array") => {
                        errors.push(format!(
                            "Property '{path}' is an array of arrays; the API does not \
                             accept directly nested arrays"
                        ));
                    }
                    Some("object") => {
                        if let Some(children) = items.get("properties").and_then(Value::as_object)
                        {
                            walk_properties(children, &format!("{path}[]"), errors, budget);
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_flat_object_schema() {
        let schema = json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "total": {"type": "number"}
            }
        });
        let v = validate_schema(&schema);
        assert!(v.valid, "errors: {:?}", v.errors);
        assert!(v.errors.is_empty());
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn rejects_non_object_root() {
        let v = validate_schema(&json!({"type": "array", "items": {"type": "string"}}));
        assert!(!v.valid);
        assert_eq!(v.errors.len(), 1);
    }

    #[test]
    fn rejects_root_without_properties() {
        let v = validate_schema(&json!({"type": "object", "properties": {}}));
        assert!(!v.valid);
        assert_eq!(v.errors.len(), 1);
        assert!(v.errors[0].contains("at least one property"));
    }

    #[test]
    fn object_property_error_names_path() {
        let schema = json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "meta": {"type": "object", "properties": {"x": {"type": "string"}}}
            }
        });
        let v = validate_schema(&schema);
        assert!(!v.valid);
        assert!(v.errors.iter().any(|e| e.contains("'meta'")), "{:?}", v.errors);
    }

    #[test]
    fn object_inside_array_items_reported_with_bracket_suffix() {
        let schema = json!({
            "type": "object",
            "properties": {
                "rows": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "conditions": {
                                "type": "object",
                                "properties": {"temperature": {"type": "string"}}
                            }
                        }
                    }
                }
            }
        });
        let v = validate_schema(&schema);
        assert!(!v.valid);
        assert!(
            v.errors.iter().any(|e| e.contains("'rows[].conditions'")),
            "{:?}",
            v.errors
        );
    }

    #[test]
    fn deeply_nested_objects_each_reported() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {
                    "type": "object",
                    "properties": {
                        "b": {
                            "type": "object",
                            "properties": {"c": {"type": "string"}}
                        }
                    }
                }
            }
        });
        let v = validate_schema(&schema);
        assert_eq!(v.errors.len(), 2);
        // Document order: outer object first, then its offending child.
        assert!(v.errors[0].contains("'a'"));
        assert!(v.errors[1].contains("'a.b'"));
    }

    #[test]
    fn rejects_directly_nested_arrays() {
        let schema = json!({
            "type": "object",
            "properties": {
                "grid": {"type": "array", "items": {"type": "array", "items": {"type": "string"}}}
            }
        });
        let v = validate_schema(&schema);
        assert!(!v.valid);
        assert!(v.errors[0].contains("'grid'"));
        assert!(v.errors[0].contains("nested arrays"));
    }

    #[test]
    fn property_count_limit_spans_nesting() {
        // 101 properties split between the root and array item objects.
        let mut root_props = Map::new();
        for i in 0..50 {
            root_props.insert(format!("f{i}"), json!({"type": "string"}));
        }
        let mut item_props = Map::new();
        for i in 0..50 {
            item_props.insert(format!("g{i}"), json!({"type": "string"}));
        }
        root_props.insert(
            "rows".to_string(),
            json!({"type": "array", "items": {"type": "object", "properties": item_props}}),
        );
        let schema = json!({"type": "object", "properties": root_props});

        let v = validate_schema(&schema);
        assert!(!v.valid);
        assert!(
            v.errors.iter().any(|e| e.contains("101 properties")),
            "{:?}",
            v.errors
        );
    }

    #[test]
    fn property_name_length_limit_enforced() {
        let long_name = "x".repeat(10_001);
        let schema = json!({
            "type": "object",
            "properties": { long_name: {"type": "string"} }
        });
        let v = validate_schema(&schema);
        assert!(!v.valid);
        assert!(v.errors.iter().any(|e| e.contains("10001 characters")));
    }

    #[test]
    fn oversized_schema_warns_without_blocking() {
        let schema = json!({
            "type": "object",
            "properties": {
                "notes": {"type": "string", "description": "d".repeat(16_000)}
            }
        });
        let v = validate_schema(&schema);
        assert!(v.valid);
        assert!(v.errors.is_empty());
        assert_eq!(v.warnings.len(), 1);
    }

    #[test]
    fn error_order_is_deterministic() {
        let schema = json!({
            "type": "object",
            "properties": {
                "second": {"type": "object", "properties": {"x": {"type": "string"}}},
                "first": {"type": "object", "properties": {"y": {"type": "string"}}}
            }
        });
        let a = validate_schema(&schema);
        let b = validate_schema(&schema);
        assert_eq!(a.errors, b.errors);
        // Insertion order, not alphabetical.
        assert!(a.errors[0].contains("'second'"));
        assert!(a.errors[1].contains("'first'"));
    }
}

//! Automatic repair of the nested-object constraint violation.
//!
//! Generated schemas routinely arrive with `object`-typed properties, which
//! the extraction API rejects. The fix flattens each one into sibling
//! properties named `<parent>_<child>`, recursing bottom-up so arbitrarily
//! deep nesting collapses into a single flat prefix chain. Array items that
//! are objects keep their shape (that placement is allowed) but their own
//! properties are flattened the same way.

use serde_json::{Map, Value};

/// Rewrite a schema so that no `object`-typed property remains at any depth.
///
/// Pure transform: the input is never mutated and the output shares no
/// structure with it. Idempotent: one pass removes every violation, so a
/// second pass returns its input unchanged. `required` lists are left as
/// they are, including entries that named a now-flattened object.
pub fn auto_fix_schema(schema: &Value) -> Value {
    let mut fixed = schema.clone();
    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        fixed["properties"] = Value::Object(flatten_properties(props));
    }
    fixed
}

/// Rebuild a `properties` map with every object property flattened and every
/// array property recursively fixed. Insertion order is preserved, flattened
/// children taking their parent's position.
fn flatten_properties(props: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (name, def) in props {
        match def.get("type").and_then(Value::as_str) {
            Some("object") => {
                let children = def
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(flatten_properties)
                    .unwrap_or_default();
                for (child_name, child_def) in children {
                    out.insert(
                        format!("{name}_{child_name}"),
                        with_fallback_description(child_def, name, &child_name),
                    );
                }
            }
            Some("array") => {
                out.insert(name.clone(), fix_array(def));
            }
            _ => {
                out.insert(name.clone(), def.clone());
            }
        }
    }
    out
}

/// Fix an array definition by flattening object properties inside its items.
fn fix_array(def: &Value) -> Value {
    let mut fixed = def.clone();
    if let Some(items) = def.get("items") {
        if items.get("type").and_then(Value::as_str) == Some("object") {
            if let Some(props) = items.get("properties").and_then(Value::as_object) {
                let mut fixed_items = items.clone();
                fixed_items["properties"] = Value::Object(flatten_properties(props));
                fixed["items"] = fixed_items;
            }
        }
    }
    fixed
}

/// Flattened fields keep their own description; ones that had none get a
/// `"<parent> > <child>"` breadcrumb so the origin stays visible.
fn with_fallback_description(mut def: Value, parent: &str, child: &str) -> Value {
    let has_description = def.get("description").and_then(Value::as_str).is_some();
    if !has_description {
        if let Some(obj) = def.as_object_mut() {
            obj.insert(
                "description".to_string(),
                Value::String(format!("{parent} > {child}")),
            );
        }
    }
    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate::validate_schema;
    use serde_json::json;

    fn count_object_properties(schema: &Value) -> usize {
        validate_schema(schema)
            .errors
            .iter()
            .filter(|e| e.contains("is an object"))
            .count()
    }

    #[test]
    fn flattens_simple_nested_object() {
        let schema = json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "meta": {"type": "object", "properties": {"x": {"type": "string"}}}
            }
        });
        let fixed = auto_fix_schema(&schema);
        assert_eq!(fixed["properties"]["title"]["type"], "string");
        assert_eq!(fixed["properties"]["meta_x"]["type"], "string");
        assert_eq!(fixed["properties"]["meta_x"]["description"], "meta > x");
        assert!(fixed["properties"].get("meta").is_none());
    }

    #[test]
    fn existing_descriptions_survive_flattening() {
        let schema = json!({
            "type": "object",
            "properties": {
                "meta": {
                    "type": "object",
                    "properties": {"x": {"type": "string", "description": "The x field"}}
                }
            }
        });
        let fixed = auto_fix_schema(&schema);
        assert_eq!(fixed["properties"]["meta_x"]["description"], "The x field");
    }

    #[test]
    fn deep_nesting_collapses_to_one_prefix_chain() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {
                    "type": "object",
                    "properties": {
                        "b": {
                            "type": "object",
                            "properties": {"c": {"type": "number"}}
                        }
                    }
                }
            }
        });
        let fixed = auto_fix_schema(&schema);
        assert_eq!(fixed["properties"]["a_b_c"]["type"], "number");
        assert_eq!(count_object_properties(&fixed), 0);
    }

    #[test]
    fn flattens_objects_inside_array_items() {
        let schema = json!({
            "type": "object",
            "properties": {
                "rows": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "conditions": {
                                "type": "object",
                                "properties": {
                                    "temperature": {"type": "string"},
                                    "time": {"type": "string"}
                                }
                            }
                        }
                    }
                }
            }
        });
        let fixed = auto_fix_schema(&schema);
        let items = &fixed["properties"]["rows"]["items"]["properties"];
        assert_eq!(items["name"]["type"], "string");
        assert_eq!(items["conditions_temperature"]["type"], "string");
        assert_eq!(items["conditions_time"]["description"], "conditions > time");
        assert!(validate_schema(&fixed).valid);
    }

    #[test]
    fn output_is_idempotent() {
        let schema = json!({
            "type": "object",
            "properties": {
                "meta": {
                    "type": "object",
                    "properties": {
                        "inner": {"type": "object", "properties": {"x": {"type": "string"}}}
                    }
                },
                "rows": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "std": {"type": "object", "properties": {"value": {"type": "string"}}}
                        }
                    }
                }
            }
        });
        let once = auto_fix_schema(&schema);
        let twice = auto_fix_schema(&once);
        assert_eq!(once, twice);
        assert_eq!(count_object_properties(&once), 0);
    }

    #[test]
    fn input_is_not_mutated() {
        let schema = json!({
            "type": "object",
            "properties": {
                "meta": {"type": "object", "properties": {"x": {"type": "string"}}}
            }
        });
        let before = schema.clone();
        let _ = auto_fix_schema(&schema);
        assert_eq!(schema, before);
    }

    #[test]
    fn required_list_is_left_alone() {
        let schema = json!({
            "type": "object",
            "properties": {
                "meta": {"type": "object", "properties": {"x": {"type": "string"}}}
            },
            "required": ["meta"]
        });
        let fixed = auto_fix_schema(&schema);
        assert_eq!(fixed["required"], json!(["meta"]));
    }

    #[test]
    fn compliant_schema_passes_through_unchanged() {
        let schema = json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "rows": {
                    "type": "array",
                    "items": {"type": "object", "properties": {"v": {"type": "number"}}}
                }
            }
        });
        assert_eq!(auto_fix_schema(&schema), schema);
    }

    #[test]
    fn flattened_fields_keep_parent_position() {
        let schema = json!({
            "type": "object",
            "properties": {
                "first": {"type": "string"},
                "meta": {"type": "object", "properties": {"x": {"type": "string"}}},
                "last": {"type": "string"}
            }
        });
        let fixed = auto_fix_schema(&schema);
        let keys: Vec<&String> = fixed["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["first", "meta_x", "last"]);
    }
}

//! Flat field view of a schema for visual editing.
//!
//! The visual editor shows only root-level properties as (name, type,
//! description) rows. Array definitions richer than that (nested object
//! items with their own properties) are carried through opaquely in
//! `original_def`, so a visual → code → visual round trip never loses
//! structure the editor didn't create.

use serde_json::{json, Map, Value};

/// Field types the visual editor can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    /// Unknown or missing type strings default to `String`, matching how the
    /// editor treats untyped properties.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("number") => FieldType::Number,
            Some("integer") => FieldType::Integer,
            Some("boolean") => FieldType::Boolean,
            Some("array") => FieldType::Array,
            Some("object") => FieldType::Object,
            _ => FieldType::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

/// One root-level schema property as shown in the visual editor.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualField {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
    /// Full original JSON definition, kept for array fields whose item
    /// structure the editor cannot represent.
    pub original_def: Option<Value>,
}

/// Decompose a schema into visual fields. Returns an empty list for
/// anything that is not an object schema with properties.
pub fn schema_to_fields(schema: &Value) -> Vec<VisualField> {
    let Some(props) = schema
        .get("properties")
        .and_then(Value::as_object)
        .filter(|_| schema.get("type").and_then(Value::as_str) == Some("object"))
    else {
        return Vec::new();
    };

    props
        .iter()
        .map(|(name, def)| {
            let field_type = FieldType::parse(def.get("type").and_then(Value::as_str));
            let original_def = (field_type == FieldType::Array && def.get("items").is_some())
                .then(|| def.clone());
            VisualField {
                name: name.clone(),
                field_type,
                description: def
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                original_def,
            }
        })
        .collect()
}

/// Reassemble a schema from visual fields.
///
/// Array fields restore their preserved definition (with the current
/// description applied). Arrays created fresh in the editor, and
/// object-typed fields (which the API would reject), get a generic
/// array-of-items wrapper instead.
pub fn fields_to_schema(fields: &[VisualField]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        let def = match (field.field_type, &field.original_def) {
            (FieldType::Array, Some(original)) => {
                let mut def = original.clone();
                def["description"] = Value::String(field.description.clone());
                def
            }
            (FieldType::Array, None) => generic_array_def(&field.description),
            (FieldType::Object, _) => {
                generic_array_def(&format!("{} (auto-wrapped from object)", field.description))
            }
            _ => json!({
                "type": field.field_type.as_str(),
                "description": field.description,
            }),
        };
        properties.insert(field.name.clone(), def);
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": fields.iter().map(|f| f.name.clone()).collect::<Vec<_>>(),
    })
}

fn generic_array_def(description: &str) -> Value {
    json!({
        "type": "array",
        "description": description,
        "items": {
            "type": "object",
            "properties": {
                "value": {"type": "string", "description": "Value"}
            }
        }
    })
}

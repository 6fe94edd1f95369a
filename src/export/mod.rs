//! Export of the verified data tree.
//!
//! JSON export is the tree itself, pretty-printed. CSV export flattens the
//! tree into one header row and one value row using the same path syntax
//! the metadata map uses, with spreadsheet-safe escaping.

use serde_json::Value;

use crate::metadata::path::{join_index, join_key};

/// Pretty-printed JSON for download.
pub fn export_json(data: &Value) -> String {
    serde_json::to_string_pretty(data).expect("Value serialization is infallible")
}

/// Two-row CSV (paths, then values), UTF-8 BOM prefixed so spreadsheet
/// applications pick up the encoding.
pub fn export_csv(data: &Value) -> String {
    let flat = flatten_tree(data);
    let header: Vec<String> = flat.iter().map(|(path, _)| escape_csv(path)).collect();
    let values: Vec<String> = flat.iter().map(|(_, value)| escape_csv(value)).collect();
    format!("\u{feff}{}\n{}", header.join(","), values.join(","))
}

/// Timestamped export filename, e.g. `extraction-20260805T101500.json`.
pub fn export_filename(prefix: &str, extension: &str) -> String {
    format!(
        "{prefix}-{}.{extension}",
        chrono::Utc::now().format("%Y%m%dT%H%M%S")
    )
}

/// Flatten the tree into (path, display string) pairs in field order.
/// Scalars inside arrays get indexed paths; null renders as empty.
fn flatten_tree(data: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    collect(data, "", &mut out);
    out
}

fn collect(value: &Value, path: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect(child, &join_key(path, key), out);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect(item, &join_index(path, index), out);
            }
        }
        scalar => {
            if !path.is_empty() {
                out.push((path.to_string(), display_scalar(scalar)));
            }
        }
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Quote fields containing separators and guard against spreadsheet formula
/// injection (`=SUM(...)` and friends executing on open).
fn escape_csv(value: &str) -> String {
    let guarded = if value.starts_with(['=', '+', '-', '@']) {
        format!("'{value}")
    } else {
        value.to_string()
    };
    if guarded.contains(',') || guarded.contains('"') || guarded.contains('\n') {
        format!("\"{}\"", guarded.replace('"', "\"\""))
    } else {
        guarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> Value {
        json!({
            "title": "Safety Standard",
            "criteria": [
                {"item": "viscosity", "value": 12.5},
                {"item": "boiling point", "value": null}
            ],
            "tags": ["kc", "safety"]
        })
    }

    #[test]
    fn json_export_is_pretty_printed() {
        let out = export_json(&sample_tree());
        assert!(out.contains("\n"));
        assert!(out.contains("\"title\": \"Safety Standard\""));
    }

    #[test]
    fn csv_paths_match_the_shared_syntax() {
        let csv = export_csv(&sample_tree());
        let header = csv.lines().next().unwrap();
        assert!(header.starts_with('\u{feff}'));
        assert!(header.contains("criteria[0].item"));
        assert!(header.contains("criteria[1].value"));
        assert!(header.contains("tags[1]"));
    }

    #[test]
    fn csv_has_exactly_two_rows() {
        let csv = export_csv(&sample_tree());
        assert_eq!(csv.lines().count(), 2);
        let values = csv.lines().nth(1).unwrap();
        assert!(values.contains("viscosity"));
        assert!(values.contains("12.5"));
    }

    #[test]
    fn null_renders_empty_and_bool_renders_literal() {
        let csv = export_csv(&json!({"a": null, "b": true}));
        assert_eq!(csv.lines().nth(1).unwrap(), ",true");
    }

    #[test]
    fn embedded_separators_are_quoted() {
        let csv = export_csv(&json!({"note": "a, \"b\"\nc"}));
        let values = csv.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert_eq!(values, "\"a, \"\"b\"\"\nc\"");
    }

    #[test]
    fn formula_injection_is_neutralized() {
        let csv = export_csv(&json!({"cell": "=SUM(A1:A9)", "neg": "-5"}));
        let values = csv.lines().nth(1).unwrap();
        assert!(values.contains("'=SUM(A1:A9)"));
        assert!(values.contains("'-5"));
    }

    #[test]
    fn export_filename_carries_prefix_and_extension() {
        let name = export_filename("extraction", "csv");
        assert!(name.starts_with("extraction-"));
        assert!(name.ends_with(".csv"));
    }
}

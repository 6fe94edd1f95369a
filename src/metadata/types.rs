use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One fractional point in the source document (0.0–1.0 of page size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

/// API-reported reliability of one extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

/// Per-field metadata from the extraction response's `additional_values`
/// envelope. The `_value` wrapper key is what marks a leaf during
/// flattening; everything else is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    #[serde(rename = "_value")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// Four bounding-box corner points, when location reporting is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<Coordinate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// One point list per word, at word-level location granularity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_coordinates: Option<Vec<Vec<Coordinate>>>,
}

impl FieldMetadata {
    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Some(Confidence::Low)
    }
}

//! Single-viewer session owning one extraction result at a time.
//!
//! The extracted data tree and its derived metadata map live here. Edits
//! come through one synchronous method per keystroke, so there is exactly
//! one writer and no concurrent mutation to reason about. A new `load` (or
//! `clear`) invalidates and replaces both values wholesale; metadata is
//! derived state and is never patched.

use serde_json::Value;
use thiserror::Error;

use crate::api::types::ExtractionResponse;
use crate::metadata::{
    flatten_metadata, set_value_at_path, FieldMetadata, MetadataMap, PathError,
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Extraction response has no content")]
    NoContent,

    #[error("Extracted content is not valid JSON: {0}")]
    DataParse(String),

    #[error("No extraction loaded")]
    NoExtraction,

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Holds the verified-data view of one extraction.
#[derive(Debug, Default)]
pub struct ExtractionSession {
    data: Option<Value>,
    metadata: MetadataMap,
}

impl ExtractionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest an extraction response: parse the data tree out of the message
    /// content and flatten the metadata envelope into the path map.
    ///
    /// A missing or malformed envelope degrades to an empty map: the data
    /// stays editable, just without confidence and location annotations.
    pub fn load(&mut self, response: &ExtractionResponse) -> Result<(), SessionError> {
        let content = response.content().ok_or(SessionError::NoContent)?;
        let data: Value =
            serde_json::from_str(content).map_err(|e| SessionError::DataParse(e.to_string()))?;

        let metadata = match response.metadata_arguments() {
            Some(arguments) => match serde_json::from_str::<Value>(arguments) {
                Ok(envelope) => flatten_metadata(&envelope),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Metadata envelope unparseable; continuing without confidence/location"
                    );
                    MetadataMap::new()
                }
            },
            None => MetadataMap::new(),
        };

        tracing::info!(fields = metadata.len(), "Extraction loaded into session");
        self.data = Some(data);
        self.metadata = metadata;
        Ok(())
    }

    /// Apply one user correction. The tree is replaced, never patched in
    /// place, so earlier references held by the caller stay valid.
    pub fn edit_value(&mut self, path: &str, new_value: Value) -> Result<(), SessionError> {
        let current = self.data.as_ref().ok_or(SessionError::NoExtraction)?;
        self.data = Some(set_value_at_path(current, path, new_value)?);
        Ok(())
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Metadata for one field path, if the extraction reported any.
    pub fn metadata(&self, path: &str) -> Option<&FieldMetadata> {
        self.metadata.get(path)
    }

    pub fn metadata_map(&self) -> &MetadataMap {
        &self.metadata
    }

    /// Drop the current extraction (the "redo extraction" path).
    pub fn clear(&mut self) {
        self.data = None;
        self.metadata = MetadataMap::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_with(content: &str, metadata: Option<&str>) -> ExtractionResponse {
        let tool_calls = match metadata {
            Some(args) => json!([{
                "type": "function",
                "function": {"name": "additional_values", "arguments": args}
            }]),
            None => json!([]),
        };
        serde_json::from_value(json!({
            "choices": [{
                "message": {"content": content, "tool_calls": tool_calls}
            }]
        }))
        .expect("test response")
    }

    #[test]
    fn load_parses_data_and_metadata() {
        let mut session = ExtractionSession::new();
        session
            .load(&response_with(
                r#"{"items": [{"name": "bolt"}]}"#,
                Some(r#"{"items": [{"name": {"_value": "bolt", "confidence": "low"}}]}"#),
            ))
            .unwrap();

        assert_eq!(session.data().unwrap()["items"][0]["name"], "bolt");
        assert!(session.metadata("items[0].name").unwrap().is_low_confidence());
    }

    #[test]
    fn malformed_envelope_degrades_to_no_metadata() {
        let mut session = ExtractionSession::new();
        session
            .load(&response_with(r#"{"title": "T"}"#, Some("{broken")))
            .unwrap();

        assert_eq!(session.data().unwrap()["title"], "T");
        assert!(session.metadata_map().is_empty());
    }

    #[test]
    fn missing_envelope_is_fine() {
        let mut session = ExtractionSession::new();
        session.load(&response_with(r#"{"title": "T"}"#, None)).unwrap();
        assert!(session.metadata_map().is_empty());
    }

    #[test]
    fn unparseable_content_is_an_error() {
        let mut session = ExtractionSession::new();
        let err = session
            .load(&response_with("not json at all", None))
            .unwrap_err();
        assert!(matches!(err, SessionError::DataParse(_)));
        assert!(session.data().is_none());
    }

    #[test]
    fn edit_rewrites_tree_by_path() {
        let mut session = ExtractionSession::new();
        session
            .load(&response_with(r#"{"items": [{"name": "old"}]}"#, None))
            .unwrap();
        session.edit_value("items[0].name", json!("X")).unwrap();
        assert_eq!(session.data().unwrap()["items"][0]["name"], "X");
    }

    #[test]
    fn edit_without_extraction_is_an_error() {
        let mut session = ExtractionSession::new();
        let err = session.edit_value("a", json!(1)).unwrap_err();
        assert!(matches!(err, SessionError::NoExtraction));
    }

    #[test]
    fn metadata_survives_edits_untouched() {
        let mut session = ExtractionSession::new();
        session
            .load(&response_with(
                r#"{"title": "T"}"#,
                Some(r#"{"title": {"_value": "T", "confidence": "high"}}"#),
            ))
            .unwrap();
        session.edit_value("title", json!("corrected")).unwrap();
        // The map still describes the original extraction.
        assert_eq!(session.metadata("title").unwrap().value, json!("T"));
    }

    #[test]
    fn new_load_replaces_everything() {
        let mut session = ExtractionSession::new();
        session
            .load(&response_with(
                r#"{"a": 1}"#,
                Some(r#"{"a": {"_value": 1, "confidence": "high"}}"#),
            ))
            .unwrap();
        session
            .load(&response_with(r#"{"b": 2}"#, None))
            .unwrap();

        assert!(session.data().unwrap().get("a").is_none());
        assert!(session.metadata("a").is_none());
    }

    #[test]
    fn clear_empties_both_sides() {
        let mut session = ExtractionSession::new();
        session
            .load(&response_with(
                r#"{"a": 1}"#,
                Some(r#"{"a": {"_value": 1}}"#),
            ))
            .unwrap();
        session.clear();
        assert!(session.data().is_none());
        assert!(session.metadata_map().is_empty());
    }
}

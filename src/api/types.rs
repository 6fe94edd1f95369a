//! Request options and wire types for the document AI endpoints.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::ApiError;
use crate::config;
use crate::metadata::Coordinate;

/// A document to upload: raw bytes plus the filename the API sees.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    /// Read a document from disk, enforcing the size limit before the bytes
    /// ever leave the machine.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let meta = tokio::fs::metadata(path).await?;
        check_size(meta.len())?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Ok(Self { file_name, bytes })
    }

    /// Wrap in-memory bytes (e.g. from a drag-and-drop upload).
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> Result<Self, ApiError> {
        check_size(bytes.len() as u64)?;
        Ok(Self {
            file_name: file_name.to_string(),
            bytes,
        })
    }
}

fn check_size(size: u64) -> Result<(), ApiError> {
    if size > config::MAX_FILE_SIZE {
        return Err(ApiError::FileTooLarge {
            actual_mb: size as f64 / 1024.0 / 1024.0,
            limit_mb: config::MAX_FILE_SIZE / 1024 / 1024,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    Auto,
    Force,
}

impl OcrMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrMode::Auto => "auto",
            OcrMode::Force => "force",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Standard,
    Enhanced,
    Auto,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Standard => "standard",
            ParseMode::Enhanced => "enhanced",
            ParseMode::Auto => "auto",
        }
    }
}

/// Extraction mode: enhanced is slower but handles complex tables and scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    Standard,
    Enhanced,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Standard => "standard",
            ExtractionMode::Enhanced => "enhanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationGranularity {
    Element,
    Word,
    All,
}

impl LocationGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationGranularity::Element => "element",
            LocationGranularity::Word => "word",
            LocationGranularity::All => "all",
        }
    }
}

/// Options for the document parse endpoint.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub model: String,
    pub ocr: OcrMode,
    pub mode: ParseMode,
    pub output_formats: Vec<String>,
    pub coordinates: bool,
    pub merge_multipage_tables: bool,
    /// Element categories returned as inline base64 crops. Empty falls back
    /// to the standard asset categories.
    pub base64_encoding: Vec<String>,
    pub chart_recognition: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            model: "document-parse-nightly".to_string(),
            ocr: OcrMode::Auto,
            mode: ParseMode::Standard,
            output_formats: vec!["html".to_string()],
            coordinates: true,
            merge_multipage_tables: true,
            base64_encoding: default_asset_categories(),
            chart_recognition: true,
        }
    }
}

pub fn default_asset_categories() -> Vec<String> {
    ["figure", "chart", "table", "equation"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl ParseOptions {
    /// Render as multipart form fields. List-valued fields use the API's
    /// bracket syntax: `['html', 'text']`.
    pub(crate) fn to_form_fields(&self) -> Vec<(String, String)> {
        let encoding = if self.base64_encoding.is_empty() {
            default_asset_categories()
        } else {
            self.base64_encoding.clone()
        };
        vec![
            ("model".to_string(), self.model.clone()),
            ("ocr".to_string(), self.ocr.as_str().to_string()),
            ("mode".to_string(), self.mode.as_str().to_string()),
            ("coordinates".to_string(), self.coordinates.to_string()),
            (
                "merge_multipage_tables".to_string(),
                self.merge_multipage_tables.to_string(),
            ),
            (
                "chart_recognition".to_string(),
                self.chart_recognition.to_string(),
            ),
            ("output_formats".to_string(), bracket_list(&self.output_formats)),
            ("base64_encoding".to_string(), bracket_list(&encoding)),
        ]
    }
}

fn bracket_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Options for the information extraction endpoint.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    pub model: String,
    pub mode: ExtractionMode,
    /// Validated (or auto-fixed) extraction schema.
    pub schema: Value,
    pub confidence: bool,
    pub location: bool,
    pub location_granularity: LocationGranularity,
}

impl ExtractionOptions {
    pub fn new(schema: Value) -> Self {
        Self {
            model: "information-extract".to_string(),
            mode: ExtractionMode::Standard,
            schema,
            confidence: true,
            location: true,
            location_granularity: LocationGranularity::Element,
        }
    }
}

// ── Wire responses ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedContent {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub text: String,
}

/// One layout element detected by the parser (table, figure, equation, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedElement {
    pub id: i64,
    pub page: u32,
    pub category: String,
    #[serde(default)]
    pub content: ParsedContent,
    #[serde(default)]
    pub coordinates: Vec<Coordinate>,
    /// Inline PNG crop for asset categories, when requested.
    #[serde(default)]
    pub base64_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ParseUsage {
    #[serde(default)]
    pub pages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseResponse {
    pub content: ParsedContent,
    #[serde(default)]
    pub elements: Vec<ParsedElement>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<ParseUsage>,
}

impl ParseResponse {
    /// Elements that carry an inline image crop: the viewer's asset list.
    pub fn assets(&self) -> impl Iterator<Item = &ParsedElement> {
        self.elements
            .iter()
            .filter(|el| el.base64_encoding.is_some())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    /// Stringified JSON payload.
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(rename = "type", default)]
    pub call_type: Option<String>,
    pub function: ToolFunction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Stringified JSON of the extracted data tree.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionUsage {
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Chat-completions style envelope returned by the extraction and schema
/// generation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<ExtractionUsage>,
}

/// The function name carrying the metadata envelope.
const ADDITIONAL_VALUES: &str = "additional_values";

impl ExtractionResponse {
    /// The stringified extracted data, if the response carried any choice.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    /// Stringified metadata envelope from the `additional_values` tool call.
    pub fn metadata_arguments(&self) -> Option<&str> {
        let call = self.choices.first()?.message.tool_calls.first()?;
        (call.function.name == ADDITIONAL_VALUES).then_some(call.function.arguments.as_str())
    }
}

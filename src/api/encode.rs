//! Document payload encoding for the JSON endpoints.

use base64::Engine as _;

use super::types::Document;

/// Encode a document as the octet-stream data URL the extraction endpoints
/// expect inside their `image_url` message content.
pub fn data_url(document: &Document) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&document.bytes);
    format!("data:application/octet-stream;base64,{encoded}")
}

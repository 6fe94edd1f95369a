//! Document AI endpoint clients.
//!
//! One client, three operations: document parse (multipart), information
//! extraction (JSON, with gateway-timeout retry), and schema generation
//! (JSON). All three share the transport seam, the per-attempt timeout and
//! the status classification; only extraction retries, because only its
//! upstream is slow enough to hit the gateway.

use serde_json::{json, Value};

use super::encode;
use super::retry::{self, RetryState, MAX_RETRIES};
use super::transport::{DocumentTransport, HttpTransport, TransportError};
use super::types::{
    Document, ExtractionOptions, ExtractionResponse, ParseOptions, ParseResponse,
};
use super::{rejected, ApiError};
use crate::config::ApiConfig;
use crate::schema::{validate_schema, SchemaError};

/// Client for the document AI API. Construction is cheap; the underlying
/// HTTP client is reused across calls.
pub struct DocumentAiClient {
    config: ApiConfig,
    transport: Box<dyn DocumentTransport>,
}

impl DocumentAiClient {
    pub fn new(config: ApiConfig) -> Self {
        let transport = Box::new(HttpTransport::new(config.request_timeout));
        Self { config, transport }
    }

    /// Swap in a different transport (tests use [`super::MockTransport`]).
    pub fn with_transport(config: ApiConfig, transport: Box<dyn DocumentTransport>) -> Self {
        Self { config, transport }
    }

    /// Parse a document into structured HTML/markdown/text plus layout
    /// elements. No retry loop: parsing responds fast enough that a 504
    /// means something is actually wrong.
    pub async fn parse(
        &self,
        document: &Document,
        options: &ParseOptions,
    ) -> Result<ParseResponse, ApiError> {
        tracing::info!(
            file = %document.file_name,
            size = document.bytes.len(),
            model = %options.model,
            "Parsing document"
        );

        let response = self
            .transport
            .post_multipart(
                &self.config.parse_url(),
                &self.config.api_key,
                document,
                &options.to_form_fields(),
            )
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.is_success() {
            return Err(rejected(response.status, &response.body));
        }

        let parsed: ParseResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        tracing::info!(
            elements = parsed.elements.len(),
            pages = parsed.usage.map(|u| u.pages).unwrap_or_default(),
            "Document parsed"
        );
        Ok(parsed)
    }

    /// Extract structured data conforming to the schema in `options`.
    ///
    /// The schema is validated first and never sent when invalid. HTTP 504
    /// is retried with the backoff table in [`super::retry`]; any other
    /// failure is terminal. `on_progress` receives one status line at send
    /// time and one per retry, each naming its attempt.
    pub async fn extract(
        &self,
        document: &Document,
        options: &ExtractionOptions,
        mut on_progress: impl FnMut(&str),
    ) -> Result<ExtractionResponse, ApiError> {
        let validation = validate_schema(&options.schema);
        if !validation.valid {
            return Err(SchemaError::Invalid(validation.errors).into());
        }
        for warning in &validation.warnings {
            tracing::warn!(warning = %warning, "Schema validation warning");
        }

        let data_url = encode::data_url(document);
        let payload = build_extraction_request(options, &data_url);
        let url = self.config.extraction_url();
        let total_attempts = MAX_RETRIES + 1;

        on_progress("Encoding document and sending to the extraction API...");
        tracing::info!(
            file = %document.file_name,
            size = document.bytes.len(),
            mode = options.mode.as_str(),
            "Starting extraction"
        );

        let mut state = RetryState::start();
        while let RetryState::Attempting(attempt) = state {
            let response = self
                .transport
                .post_json(&url, &self.config.api_key, &payload)
                .await
                .map_err(|e| self.transport_error(e))?;

            if response.is_success() {
                tracing::info!(attempt = attempt + 1, "Extraction succeeded");
                return serde_json::from_str(&response.body)
                    .map_err(|e| ApiError::InvalidResponse(e.to_string()));
            }

            if !retry::is_gateway_timeout(response.status) {
                return Err(rejected(response.status, &response.body));
            }

            state = state.on_attempt_result(true);
            if let RetryState::Waiting(n) = state {
                let delay = retry::backoff_delay(n);
                on_progress(&format!(
                    "Gateway timeout (504). Waiting {}s before attempt {}/{}...",
                    delay.as_secs(),
                    n + 2,
                    total_attempts
                ));
                tracing::warn!(
                    attempt = n + 1,
                    delay_secs = delay.as_secs(),
                    "Gateway timeout, backing off"
                );
                tokio::time::sleep(delay).await;
                state = state.next_attempt();
            }
        }

        tracing::error!(attempts = total_attempts, "Gateway timeouts exhausted retries");
        Err(ApiError::RepeatedGatewayTimeout {
            attempts: total_attempts,
        })
    }

    /// Ask the API to draft an extraction schema for a document. The reply
    /// arrives as chat content, usually fenced; fences are stripped before
    /// parsing. Run the result through validate/auto-fix before using it.
    pub async fn generate_schema(
        &self,
        document: &Document,
        mut on_progress: impl FnMut(&str),
    ) -> Result<Value, ApiError> {
        on_progress("Preparing file...");
        let data_url = encode::data_url(document);

        on_progress("Analyzing document structure...");
        let payload = build_schema_gen_request(&data_url);
        let response = self
            .transport
            .post_json(&self.config.schema_gen_url(), &self.config.api_key, &payload)
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.is_success() {
            return Err(rejected(response.status, &response.body));
        }

        let parsed: ExtractionResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let content = parsed
            .content()
            .ok_or_else(|| ApiError::InvalidResponse("response has no choices".to_string()))?;

        let clean = content.replace("```json", "").replace("```", "");
        serde_json::from_str(clean.trim())
            .map_err(|e| ApiError::GeneratedSchemaInvalid(e.to_string()))
    }

    fn transport_error(&self, error: TransportError) -> ApiError {
        match error {
            TransportError::TimedOut => {
                ApiError::RequestTimedOut(self.config.request_timeout.as_secs())
            }
            TransportError::Unreachable(msg) | TransportError::Other(msg) => {
                ApiError::NetworkUnreachable(msg)
            }
        }
    }
}

fn build_extraction_request(options: &ExtractionOptions, data_url: &str) -> Value {
    json!({
        "model": options.model,
        "messages": [{
            "role": "user",
            "content": [{
                "type": "image_url",
                "image_url": { "url": data_url }
            }]
        }],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": "document_schema",
                "schema": options.schema
            }
        },
        "mode": options.mode.as_str(),
        "confidence": options.confidence,
        "location": options.location,
        "location_granularity": options.location_granularity.as_str()
    })
}

fn build_schema_gen_request(data_url: &str) -> Value {
    json!({
        "model": "information-extract",
        "messages": [{
            "role": "user",
            "content": [
                {
                    "role": "system",
                    "content": "Generate a JSON schema for the main tables and key-value pairs in this document."
                },
                {
                    "type": "image_url",
                    "image_url": { "url": data_url }
                }
            ]
        }]
    })
}

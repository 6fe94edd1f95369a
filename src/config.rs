use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "DocuParse";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "docuparse=info"
}

/// Base URL of the document AI API.
pub const DEFAULT_BASE_URL: &str = "https://api.upstage.ai/v1";

/// Endpoint paths relative to the base URL.
pub const PARSE_PATH: &str = "/document-ai/document-parse";
pub const EXTRACTION_PATH: &str = "/information-extraction/chat/completions";
pub const SCHEMA_GEN_PATH: &str = "/information-extraction/schema-generation/chat/completions";

/// Per-attempt request timeout. The only forced abort path; there is no
/// user-triggered mid-flight cancellation.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Maximum accepted document size in bytes (rejected locally, before upload).
pub const MAX_FILE_SIZE: u64 = 30 * 1024 * 1024;

/// Connection settings for the document AI API.
///
/// Passed explicitly into [`crate::api::DocumentAiClient`]; core functions
/// never read credentials from ambient globals.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Config for the hosted API with default endpoints and timeout.
    /// Surrounding whitespace in the key (a paste artifact) is stripped.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Point at a different deployment (e.g. a local proxy).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn parse_url(&self) -> String {
        format!("{}{}", self.base_url, PARSE_PATH)
    }

    pub fn extraction_url(&self) -> String {
        format!("{}{}", self.base_url, EXTRACTION_PATH)
    }

    pub fn schema_gen_url(&self) -> String {
        format!("{}{}", self.base_url, SCHEMA_GEN_PATH)
    }
}

//! HTTP transport seam for the document AI endpoints.
//!
//! The endpoint clients and the retry driver talk to [`DocumentTransport`]
//! instead of reqwest directly, so tests can script status sequences
//! (504, 504, 200, ...) without a server.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::types::Document;

/// Transport-level failure: the request produced no HTTP status at all.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("request timed out")]
    TimedOut,

    #[error("connection failed: {0}")]
    Unreachable(String),

    #[error("{0}")]
    Other(String),
}

/// Raw HTTP outcome: status code plus body text. Decoding into typed
/// responses happens above this seam.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait DocumentTransport: Send + Sync {
    /// POST a JSON body with bearer auth.
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<RawResponse, TransportError>;

    /// POST a multipart form: the document binary plus text fields.
    async fn post_multipart(
        &self,
        url: &str,
        api_key: &str,
        document: &Document,
        fields: &[(String, String)],
    ) -> Result<RawResponse, TransportError>;
}

/// Forwarding impl so tests can keep a handle on a shared transport while
/// the client owns another.
#[async_trait]
impl<T: DocumentTransport + ?Sized> DocumentTransport for std::sync::Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<RawResponse, TransportError> {
        (**self).post_json(url, api_key, body).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        api_key: &str,
        document: &Document,
        fields: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        (**self).post_multipart(url, api_key, document, fields).await
    }
}

/// Production transport over reqwest. The client-level timeout bounds each
/// attempt end to end; aborting the in-flight request on expiry is the only
/// forced cancellation path.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

#[async_trait]
impl DocumentTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_response(response).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        api_key: &str,
        document: &Document,
        fields: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        let mut form = reqwest::multipart::Form::new().part(
            "document",
            reqwest::multipart::Part::bytes(document.bytes.clone())
                .file_name(document.file_name.clone()),
        );
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<RawResponse, TransportError> {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Ok(RawResponse { status, body })
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::TimedOut
    } else if e.is_connect() {
        TransportError::Unreachable(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

/// Scripted transport for tests. Pops one queued outcome per request and
/// records what was sent.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<Value>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_status(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .expect("mock lock")
            .push_back(Ok(RawResponse {
                status,
                body: body.to_string(),
            }));
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses
            .lock()
            .expect("mock lock")
            .push_back(Err(error));
    }

    /// JSON bodies of every request seen so far (multipart requests record
    /// their field list).
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().expect("mock lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock lock").len()
    }

    fn pop(&self) -> Result<RawResponse, TransportError> {
        self.responses
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Other(
                    "MockTransport: no scripted response left".to_string(),
                ))
            })
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentTransport for MockTransport {
    async fn post_json(
        &self,
        _url: &str,
        _api_key: &str,
        body: &Value,
    ) -> Result<RawResponse, TransportError> {
        self.requests.lock().expect("mock lock").push(body.clone());
        self.pop()
    }

    async fn post_multipart(
        &self,
        _url: &str,
        _api_key: &str,
        document: &Document,
        fields: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        let record = serde_json::json!({
            "document": document.file_name,
            "fields": fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<serde_json::Map<_, _>>(),
        });
        self.requests.lock().expect("mock lock").push(record);
        self.pop()
    }
}

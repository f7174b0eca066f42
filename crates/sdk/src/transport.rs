use async_trait::async_trait;
use paynow_types::FieldMap;
use tracing::{debug, warn};

use crate::error::{PaynowError, Result};

/// HTTP method for a gateway request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A transport-ready gateway request.
///
/// Immutable once created; this is the only interface handed to the
/// [`HttpTransport`] collaborator.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    url: String,
    method: HttpMethod,
    fields: FieldMap,
}

impl RequestDescriptor {
    /// A POST request carrying form-encoded fields.
    pub fn post(url: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            fields,
        }
    }

    /// A plain GET request with no fields.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            fields: FieldMap::new(),
        }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Fields to send as the form-encoded body.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }
}

/// Executes gateway requests.
///
/// The SDK performs no transport work of its own: implementations POST
/// the descriptor's fields as form-encoded data (or perform a plain
/// request when the field map is empty), parse the response body (also
/// form-encoded `key=value` pairs) into a [`FieldMap`] preserving the
/// delivered order, and surface any transport failure as a
/// [`PaynowError::Connection`] / [`PaynowError::Http`]. No retries,
/// timeouts, or redirect policy are imposed here.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute the request and return the response fields.
    async fn execute(&self, request: &RequestDescriptor) -> Result<FieldMap>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn execute(&self, request: &RequestDescriptor) -> Result<FieldMap> {
        (**self).execute(request).await
    }
}

/// Default transport over a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport over an existing client (connection pooling,
    /// proxy or TLS settings stay with the caller).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<FieldMap> {
        debug!(url = %request.url(), method = ?request.method(), "Executing gateway request");

        let response = match request.method() {
            HttpMethod::Post => {
                self.client
                    .post(request.url())
                    .form(request.fields())
                    .send()
                    .await?
            }
            HttpMethod::Get => self.client.get(request.url()).send().await?,
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(url = %request.url(), %status, "Gateway returned non-success status");
            return Err(PaynowError::Connection(format!("HTTP {}: {}", status, body)));
        }

        let body = response.text().await?;
        Ok(FieldMap::from_form_body(&body))
    }
}

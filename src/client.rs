// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rate-limited CRPT registry client.
//!
//! Every outbound call passes through the admission gate first. Failed
//! sends still count against the quota.

use crate::config::ClientConfig;
use crate::error::{ApiError, Result, TransportError};
use crate::limiter::RateLimiter;
use crate::models::{Document, DocumentRequest};
use crate::resetter::WindowResetter;
use crate::validator::DocumentValidator;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Document creation endpoint, relative to the base URL.
pub const CREATE_DOCUMENT_ENDPOINT: &str = "/api/v3/lk/documents/create";

/// CRPT registry client.
pub struct CrptApi {
    base_url: String,
    headers: HeaderMap,
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    validator: DocumentValidator,
    resetter: WindowResetter,
}

impl CrptApi {
    /// Create a new client and start its window resetter.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns [`ApiError::Configuration`] for a zero request limit, an
    /// invalid base URL or header, or when no runtime is available.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit)?);

        let base_url = config
            .base_url
            .strip_suffix('/')
            .unwrap_or(&config.base_url)
            .to_string();
        Url::parse(&base_url)
            .map_err(|e| ApiError::config(format!("invalid base URL {base_url:?}: {e}")))?;

        let headers = build_headers(&config)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;

        let resetter = WindowResetter::start(Arc::clone(&limiter))?;

        info!(
            base_url = %base_url,
            request_limit = config.rate_limit.request_limit,
            time_unit = %config.rate_limit.time_unit,
            "CRPT API client ready"
        );

        Ok(Self {
            base_url,
            headers,
            client,
            limiter,
            validator: DocumentValidator::new(config.validation),
            resetter,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The admission gate shared by all calls on this client.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Submit a goods introduction document.
    ///
    /// The document is validated first and blank dates are filled in place.
    /// Waits for a request slot if the quota is exhausted.
    pub async fn create_document(&self, document: &mut Document, signature: &str) -> Result<()> {
        self.validator.prepare(document)?;
        let request = DocumentRequest {
            document,
            signature,
        };
        self.submit(CREATE_DOCUMENT_ENDPOINT, &request, std::future::pending())
            .await
    }

    /// Like [`create_document`](Self::create_document), but gives up with
    /// [`ApiError::Interrupted`] if `cancel` completes while waiting for a
    /// request slot. A cancelled call consumes no slot.
    pub async fn create_document_or_cancel<F>(
        &self,
        document: &mut Document,
        signature: &str,
        cancel: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.validator.prepare(document)?;
        let request = DocumentRequest {
            document,
            signature,
        };
        self.submit(CREATE_DOCUMENT_ENDPOINT, &request, cancel).await
    }

    /// Stop the window resetter. Safe to call more than once.
    ///
    /// The client stays usable afterwards; admission then relies on the
    /// gate's own window check.
    pub async fn shutdown(&self) {
        self.resetter.shutdown().await;
        info!("CRPT API client shut down");
    }

    /// POST `payload` as JSON to `endpoint` once a slot is granted.
    async fn submit<T, F>(&self, endpoint: &str, payload: &T, cancel: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: Future<Output = ()>,
    {
        let body = serde_json::to_vec(payload)?;
        let url = format!("{}{}", self.base_url, endpoint);

        self.limiter.acquire_or_cancel(cancel).await?;
        debug!(url = %url, bytes = body.len(), "Sending request");

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .body(body)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if status.is_success() {
            debug!(url = %url, %status, "Request accepted");
            Ok(())
        } else {
            warn!(url = %url, %status, "Registry rejected request");
            Err(TransportError::Status { status, url }.into())
        }
    }
}

/// Content type plus configured defaults. A default may override the content type.
fn build_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in &config.default_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::config(format!("invalid header name {name:?}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::config(format!("invalid value for header {name}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

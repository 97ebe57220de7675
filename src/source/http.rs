//! HTTP record source
//!
//! Fetches metadata and records from the iteration service with `reqwest`.
//! Every failure, whether transport, non-2xx status, or a body that does not
//! decode, is reported as the fetch kind it belongs to so the controller can
//! apply its log-and-keep-state policy.

use crate::config::ApiConfig;
use crate::error::{Result, ViewerError};
use crate::source::{Iteration, IterationMeta, RecordSource};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Record source backed by the iteration HTTP service
///
/// # Examples
///
/// ```
/// use iterview::config::ApiConfig;
/// use iterview::source::HttpRecordSource;
///
/// let source = HttpRecordSource::new(&ApiConfig::default()).unwrap();
/// assert_eq!(source.base_url(), "http://localhost:8000");
/// ```
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: Client,
    base_url: String,
}

/// FastAPI-style error body, `{"detail": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl HttpRecordSource {
    /// Create a new HTTP record source
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ViewerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!(
            "Initialized record source: base_url={}, timeout={:?}",
            base_url,
            config.timeout_seconds
        );

        Ok(Self { client, base_url })
    }

    /// Base URL requests are issued against, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn meta_url(&self) -> String {
        format!("{}/iterations/meta", self.base_url)
    }

    fn iteration_url(&self, page: u32) -> String {
        format!("{}/iteration/{}", self.base_url, page)
    }

    /// GET a JSON document, flattening every failure into a message
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> std::result::Result<T, String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(describe_error_response(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("invalid response body: {}", e))
    }
}

/// Build a readable message from a non-2xx response
///
/// Prefers the `detail` field the service puts in its error bodies and falls
/// back to the raw body text.
fn describe_error_response(status: StatusCode, body: &str) -> String {
    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    };

    if detail.is_empty() {
        format!("server returned {}", status)
    } else {
        format!("server returned {}: {}", status, detail)
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch_meta(&self) -> Result<IterationMeta> {
        self.get_json::<IterationMeta>(&self.meta_url())
            .await
            .map_err(|message| ViewerError::MetaFetch(message).into())
    }

    async fn fetch_iteration(&self, page: u32) -> Result<Iteration> {
        self.get_json::<Iteration>(&self.iteration_url(page))
            .await
            .map_err(|message| ViewerError::RecordFetch { page, message }.into())
    }
}

//! HTTP client for store APIs using wreq for TLS fingerprint emulation.

use crate::config::{Config, StoreConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use wreq::Client;
use wreq_util::Emulation;

/// Request method used by a store endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        })
    }
}

/// A single upstream call, fully described.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl UpstreamRequest {
    /// Builds the request a store's settings describe.
    pub fn from_store(config: &StoreConfig) -> Self {
        Self {
            method: config.method,
            url: config.url(),
            headers: config.headers.clone(),
            body: match config.method {
                HttpMethod::Post => config.body.clone(),
                HttpMethod::Get => None,
            },
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Transport-level failure for one upstream call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for fetching JSON from store APIs - enables mocking for tests.
#[async_trait]
pub trait JsonFetch: Send + Sync {
    /// Issues the request and returns the parsed JSON body.
    async fn fetch_json(&self, request: &UpstreamRequest) -> Result<Value, FetchError>;
}

/// Store API HTTP client with browser impersonation.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms()));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    async fn send(&self, request: &UpstreamRequest) -> Result<Value, FetchError> {
        let url = request.url.as_str();

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        }
        .emulation(Emulation::Chrome131);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|source| FetchError::Request { url: url.to_string(), source })?;

        let status = response.status();
        debug!("Response status: {} ({})", status, url);

        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url: url.to_string() });
        }

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::Body { url: url.to_string(), source })?;

        serde_json::from_str(&text)
            .map_err(|source| FetchError::Decode { url: url.to_string(), source })
    }
}

#[async_trait]
impl JsonFetch for HttpClient {
    async fn fetch_json(&self, request: &UpstreamRequest) -> Result<Value, FetchError> {
        debug!("{} {}", request.method, request.url);

        tokio::time::timeout(request.timeout, self.send(request)).await.map_err(|_| {
            FetchError::Timeout {
                url: request.url.clone(),
                timeout_ms: request.timeout.as_millis(),
            }
        })?
    }
}

//! REST client for the hosted products table.
//!
//! Talks to a PostgREST-style endpoint (`<endpoint>/rest/v1/<collection>`),
//! authenticating every request with the configured service key.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::config::SeedConfig;
use catalog::ProductRecord;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("{0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("API key is not a valid header value: {0}")]
    InvalidApiKey(#[from] InvalidHeaderValue),
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Destination for seeded product records.
///
/// [`RestClient`] is the production implementation; tests substitute their own.
#[async_trait]
pub trait ProductSink: Send + Sync {
    /// Inserts one record. Any non-2xx response is an [`ApiError::Rejected`].
    async fn insert(&self, record: &ProductRecord) -> Result<(), ApiError>;

    /// Checks whether a row with this product name already exists.
    async fn exists(&self, name: &str) -> Result<bool, ApiError>;
}

/// HTTP client bound to a single collection.
pub struct RestClient {
    client: Client,
    collection_url: String,
}

impl RestClient {
    /// Creates a client that sends the service key on every request.
    pub fn new(config: &SeedConfig) -> Result<Self, ApiError> {
        Self::with_builder(Client::builder(), config)
    }

    /// Like [`RestClient::new`], starting from a caller-tuned builder
    /// (timeouts, proxies). The service key headers are added on top.
    pub fn with_builder(builder: ClientBuilder, config: &SeedConfig) -> Result<Self, ApiError> {
        let mut api_key = HeaderValue::from_str(&config.api_key)?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(header::AUTHORIZATION, bearer);

        let client = builder
            .default_headers(headers)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            collection_url: config.collection_url(),
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }
}

#[async_trait]
impl ProductSink for RestClient {
    async fn insert(&self, record: &ProductRecord) -> Result<(), ApiError> {
        debug!("POST {} ({})", self.collection_url, record.name);

        let resp = self
            .client
            .post(&self.collection_url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await?;
            return Err(ApiError::Rejected { status, body });
        }

        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool, ApiError> {
        let filter = format!("eq.{name}");

        let resp = self
            .client
            .get(&self.collection_url)
            .query(&[("select", "id"), ("name", filter.as_str()), ("limit", "1")])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await?;
            return Err(ApiError::Rejected { status, body });
        }

        let rows: Vec<serde_json::Value> = resp.json().await?;
        Ok(!rows.is_empty())
    }
}

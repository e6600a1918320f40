// src/fetch.rs

//! Upstream page fetching.
//!
//! The cache coordinator only needs "given a URL, return the page body or
//! an error", so that capability is a trait and the reqwest-backed client
//! is one implementation. Tests inject fakes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::SourceConfig;

/// Capability for fetching a page body from a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the raw text body at `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Production fetcher backed by a configured `reqwest::Client`.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured user agent and timeout.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;
        let response = response
            .error_for_status()
            .map_err(|e| AppError::fetch(url, e))?;
        response
            .text()
            .await
            .map_err(|e| AppError::fetch(url, e))
    }
}

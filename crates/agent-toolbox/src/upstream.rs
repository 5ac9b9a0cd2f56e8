//! HTTP transport to the product-master API

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Transport-level failure of an upstream call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Transport(String),
}

/// One authenticated GET against the upstream API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: Url,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

/// Raw upstream answer; status handling is left to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn get(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}

/// `UpstreamClient` backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn classify(error: &reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Transport(error.to_string())
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstream {
    async fn get(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        debug!(url = %request.url, "Sending upstream request");

        let response = self
            .client
            .get(request.url)
            .basic_auth(request.username, Some(request.password))
            .header(ACCEPT, "application/json")
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(&e))?;

        Ok(UpstreamResponse { status, body })
    }
}

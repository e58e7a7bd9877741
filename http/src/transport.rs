//! # Transport - the HTTP round trip seam
//!
//! A [`Transport`] posts one document to one URL and hands back the status and the
//! complete body text. Anything that prevents a response from arriving is a
//! [`TransportError`]. The response is consumed before `post` returns, so the
//! underlying connection is released on every path.

use crate::config::ClientConfig;
use crate::error::ConfigError;
use async_trait::async_trait;
use courier_core::{TransportError, TransportErrorKind};
use http::StatusCode;
use http::header::CONTENT_TYPE;
use std::sync::Arc;

/// Status and full body text of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Status class check (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn post(&self, url: &str, body: String) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport> Transport for Arc<T> {
    async fn post(&self, url: &str, body: String) -> Result<RawResponse, TransportError> {
        (**self).post(url, body).await
    }
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, url: &str, body: String) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::with_source(TransportErrorKind::Body, e))?;

        Ok(RawResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if err.is_request() || err.is_builder() {
        TransportErrorKind::Request
    } else if err.is_body() || err.is_decode() {
        TransportErrorKind::Body
    } else {
        TransportErrorKind::Other
    };
    TransportError::with_source(kind, err)
}

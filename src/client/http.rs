//! `reqwest`-backed transport.

use super::transport::{Transport, TransportResponse};
use crate::core::ChatRequest;
use crate::error::QueryError;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;

/// HTTP transport over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport without a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, QueryError> {
        Self::with_timeout(None)
    }

    /// Creates a transport whose requests fail after `timeout`.
    ///
    /// The timeout covers the whole exchange, body included; an expiry
    /// mid-body surfaces as a failed chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, QueryError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        payload: &ChatRequest,
    ) -> Result<TransportResponse, QueryError> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!(status, endpoint, "response headers received");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other));

        Ok(TransportResponse {
            status,
            body: Box::pin(body),
        })
    }
}

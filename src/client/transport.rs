//! Transport trait definition.
//!
//! The orchestrator issues exactly one outbound POST per query through this
//! seam. The HTTP implementation lives in [`super::http`]; tests plug in
//! scripted transports.

use crate::core::ChatRequest;
use crate::error::QueryError;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;

/// Response body as a stream of byte chunks.
///
/// An `Err` item means the connection failed mid-body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Status and body of an outbound call.
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body chunks, in arrival order.
    pub body: ByteStream,
}

impl TransportResponse {
    /// Returns `true` for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Carries a chat request to the endpoint.
///
/// Implementations must not retry: one call to [`post`](Self::post) is
/// one request on the wire. Headers arriving is enough to return; the body
/// is consumed later by the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `payload` to `endpoint` with `api_key` as bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TransportFailure`] if the request could not be
    /// sent or no response headers arrived.
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        payload: &ChatRequest,
    ) -> Result<TransportResponse, QueryError>;
}

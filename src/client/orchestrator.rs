//! Query orchestration.
//!
//! Builds the payload, records the new turns, performs the one outbound
//! call, and hands the response body to the extractor.

use super::transport::Transport;
use crate::config::Settings;
use crate::core::{ContextBuffer, PayloadBuilder, Turn};
use crate::error::QueryError;
use crate::io::{CONTENT_PATTERN, extract};

/// Composes the context buffer, payload builder, transport, and extractor.
///
/// `query` takes `&mut self`, so one orchestrator never has two requests
/// in flight. The orchestrator does not record replies on its own: the
/// caller decides whether a reply joins the context, through
/// [`record_reply`](Self::record_reply).
pub struct QueryOrchestrator<T> {
    transport: T,
    context: ContextBuffer,
    model: String,
    system_role: String,
    endpoint: String,
    api_key: String,
    pattern: String,
}

impl<T: Transport> QueryOrchestrator<T> {
    /// Creates an orchestrator configured from `settings`.
    #[must_use]
    pub fn new(transport: T, settings: &Settings) -> Self {
        Self {
            transport,
            context: ContextBuffer::with_capacity(settings.context_limit),
            model: settings.model.clone(),
            system_role: settings.system_role.clone(),
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            pattern: CONTENT_PATTERN.to_string(),
        }
    }

    /// Replaces the literal that precedes the reply in the response.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Sends `user_text` with the buffered context and returns the reply.
    ///
    /// The system instruction and the user text are sent after the
    /// buffered turns and are then recorded into the buffer, oldest turns
    /// making room first. Exactly one transport call is made.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TransportFailure`] if the call fails,
    /// [`QueryError::UnsuccessfulStatus`] for a non-2xx answer, and
    /// [`QueryError::PatternNotFound`] or [`QueryError::Incomplete`] if the
    /// body ends before a complete reply.
    pub async fn query(&mut self, user_text: &str) -> Result<String, QueryError> {
        let request =
            PayloadBuilder::build(&self.model, &self.system_role, &self.context, user_text);
        self.context.append(Turn::system(self.system_role.as_str()));
        self.context.append(Turn::user(user_text));

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            "sending chat request"
        );

        let response = self
            .transport
            .post(&self.endpoint, &self.api_key, &request)
            .await?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "endpoint returned an error status");
            return Err(QueryError::UnsuccessfulStatus {
                status: response.status,
            });
        }

        let reply = extract(response.body, &self.pattern).await?;
        tracing::debug!(chars = reply.chars().count(), "reply extracted");
        Ok(reply)
    }

    /// Appends an assistant reply to the context.
    pub fn record_reply(&mut self, reply: &str) {
        self.context.append(Turn::assistant(reply));
    }

    /// Returns the context buffer.
    #[must_use]
    pub const fn context(&self) -> &ContextBuffer {
        &self.context
    }

    /// Returns the context buffer mutably.
    pub const fn context_mut(&mut self) -> &mut ContextBuffer {
        &mut self.context
    }

    /// Returns the configured API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Replaces the system instruction used for subsequent requests.
    pub fn set_system_role(&mut self, system_role: impl Into<String>) {
        self.system_role = system_role.into();
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::TransportResponse;
    use crate::core::{ChatRequest, Role};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Replies with a fixed status and body, remembering each request.
    struct Canned {
        status: u16,
        chunks: Vec<&'static str>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl Canned {
        fn new(status: u16, chunks: Vec<&'static str>) -> Self {
            Self {
                status,
                chunks,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn post(
            &self,
            _endpoint: &str,
            _api_key: &str,
            payload: &ChatRequest,
        ) -> Result<TransportResponse, QueryError> {
            self.seen.lock().unwrap().push(payload.clone());
            let items: Vec<Result<Bytes, std::io::Error>> = self
                .chunks
                .iter()
                .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                .collect();
            Ok(TransportResponse {
                status: self.status,
                body: Box::pin(futures_util::stream::iter(items)),
            })
        }
    }

    fn settings() -> Settings {
        Settings {
            api_key: "sk-test".to_string(),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_query_returns_reply_without_recording_it() {
        let transport = Canned::new(200, vec![r#"{"content": "hi there"}"#]);
        let mut orchestrator = QueryOrchestrator::new(transport, &settings());

        let reply = orchestrator.query("hello").await.unwrap();

        assert_eq!(reply, "hi there");
        let roles: Vec<Role> = orchestrator.context().iter().map(Turn::role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
        assert_eq!(orchestrator.transport().seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_is_surfaced() {
        let transport = Canned::new(401, vec![r#"{"error": "bad key"}"#]);
        let mut orchestrator = QueryOrchestrator::new(transport, &settings());

        let err = orchestrator.query("hello").await.unwrap_err();
        assert_eq!(err, QueryError::UnsuccessfulStatus { status: 401 });
    }

    #[tokio::test]
    async fn test_custom_pattern() {
        let transport = Canned::new(200, vec![r#"{"text": "custom"}"#]);
        let mut orchestrator =
            QueryOrchestrator::new(transport, &settings()).with_pattern("\"text\": \"");

        assert_eq!(orchestrator.query("q").await.unwrap(), "custom");
    }
}

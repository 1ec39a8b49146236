//! Conversation session: the caller layer around the orchestrator.
//!
//! A session owns the orchestrator and the request gate. It refuses to
//! send without a usable API key, enforces the minimum interval, and
//! records each successful reply into the context so the next request
//! carries it.

use super::orchestrator::QueryOrchestrator;
use super::throttle::RequestGate;
use super::transport::Transport;
use crate::config::{Settings, is_usable_api_key};
use crate::core::ContextBuffer;
use crate::error::{Error, QueryError, Result};
use std::time::{Duration, Instant};

/// One conversation with the endpoint.
pub struct Session<T> {
    orchestrator: QueryOrchestrator<T>,
    gate: RequestGate,
}

impl<T: Transport> Session<T> {
    /// Creates a session configured from `settings`.
    #[must_use]
    pub fn new(transport: T, settings: &Settings) -> Self {
        Self {
            orchestrator: QueryOrchestrator::new(transport, settings),
            gate: RequestGate::new(settings.min_interval()),
        }
    }

    /// Sends `text` and returns the assistant's reply.
    ///
    /// The gate interval is measured from the end of the previous call,
    /// whether it succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidCredential`] before any network call if
    /// the key is unusable, [`Error::Throttled`] if the previous call ended
    /// too recently, or the orchestrator's error.
    pub async fn submit(&mut self, text: &str) -> Result<String> {
        if !is_usable_api_key(self.orchestrator.api_key()) {
            return Err(QueryError::InvalidCredential.into());
        }

        if let Err(wait) = self.gate.check(Instant::now()) {
            return Err(Error::Throttled {
                wait_ms: duration_ms(wait),
            });
        }

        let result = self.orchestrator.query(text).await;
        self.gate.record(Instant::now());

        let reply = result?;
        self.orchestrator.record_reply(&reply);
        Ok(reply)
    }

    /// Forgets the conversation so far.
    pub fn reset(&mut self) {
        self.orchestrator.context_mut().clear();
    }

    /// Returns the buffered context.
    #[must_use]
    pub const fn context(&self) -> &ContextBuffer {
        self.orchestrator.context()
    }

    /// Returns the orchestrator.
    #[must_use]
    pub const fn orchestrator(&self) -> &QueryOrchestrator<T> {
        &self.orchestrator
    }

    /// Replaces the system instruction sent with later messages.
    ///
    /// Turns already in the context keep the instruction they were sent
    /// with.
    pub fn set_system_role(&mut self, system_role: &str) {
        self.orchestrator.set_system_role(system_role);
    }
}

/// Converts a wait to whole milliseconds, rounding up.
fn duration_ms(wait: Duration) -> u64 {
    let millis = wait.as_micros().div_ceil(1000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_ms_rounds_up() {
        assert_eq!(duration_ms(Duration::from_micros(1)), 1);
        assert_eq!(duration_ms(Duration::from_millis(2500)), 2500);
        assert_eq!(duration_ms(Duration::ZERO), 0);
    }
}

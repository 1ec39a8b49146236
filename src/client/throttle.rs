//! Advisory minimum-interval gate between requests.
//!
//! The gate is plain state owned by the session: the time the previous
//! request finished. It is a courtesy throttle, not a lock.

use std::time::{Duration, Instant};

/// Refuses requests that start too soon after the previous one ended.
///
/// # Examples
///
/// ```
/// use chatline::client::RequestGate;
/// use std::time::{Duration, Instant};
///
/// let mut gate = RequestGate::new(Duration::from_secs(3));
/// let start = Instant::now();
/// assert!(gate.check(start).is_ok());
///
/// gate.record(start);
/// assert!(gate.check(start + Duration::from_secs(1)).is_err());
/// assert!(gate.check(start + Duration::from_secs(3)).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RequestGate {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RequestGate {
    /// Creates an open gate.
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Checks whether a request may start at `now`.
    ///
    /// # Errors
    ///
    /// Returns the time left until the gate opens.
    pub fn check(&self, now: Instant) -> Result<(), Duration> {
        let Some(last) = self.last_call else {
            return Ok(());
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_interval {
            Err(self.min_interval - elapsed)
        } else {
            Ok(())
        }
    }

    /// Records that a request finished at `now`.
    pub const fn record(&mut self, now: Instant) {
        self.last_call = Some(now);
    }
}

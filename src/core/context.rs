//! Bounded conversation context.
//!
//! The context buffer holds the turns that are sent to the remote model as
//! conversational memory. It is a strict FIFO: once the capacity is
//! reached, every append evicts the oldest turn, whatever its role.

use super::turn::Turn;
use serde::Serialize;
use std::collections::VecDeque;

/// Smallest accepted context capacity.
pub const MIN_CONTEXT_LIMIT: usize = 1;

/// Largest accepted context capacity.
pub const MAX_CONTEXT_LIMIT: usize = 25;

/// Context capacity used when nothing else is configured.
pub const DEFAULT_CONTEXT_LIMIT: usize = 3;

/// Ordered, capacity-bounded sequence of conversation turns.
///
/// Insertion order is conversational order. A system turn gets no
/// protection from eviction: if the caller re-inserts the system
/// instruction on every request, an older copy of it is just another
/// turn at the head of the queue and will be dropped first.
///
/// # Examples
///
/// ```
/// use chatline::core::{ContextBuffer, Role, Turn};
///
/// let mut buffer = ContextBuffer::with_capacity(2);
/// buffer.append(Turn::system("be brief"));
/// buffer.append(Turn::user("hi"));
/// buffer.append(Turn::assistant("hello"));
///
/// let roles: Vec<Role> = buffer.iter().map(Turn::role).collect();
/// assert_eq!(roles, vec![Role::User, Role::Assistant]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextBuffer {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl ContextBuffer {
    /// Creates an empty buffer with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CONTEXT_LIMIT)
    }

    /// Creates an empty buffer, clamping `capacity` to the accepted range.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = clamp_limit(capacity);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a turn at the tail, evicting from the head as needed so
    /// that the buffer never holds more than `capacity` turns afterwards.
    ///
    /// # Returns
    ///
    /// The evicted turns, oldest first.
    pub fn append(&mut self, turn: Turn) -> Vec<Turn> {
        let mut evicted = Vec::new();
        while self.turns.len() >= self.capacity {
            match self.turns.pop_front() {
                Some(oldest) => evicted.push(oldest),
                None => break,
            }
        }
        self.turns.push_back(turn);

        if !evicted.is_empty() {
            tracing::debug!(
                evicted = evicted.len(),
                capacity = self.capacity,
                "context buffer evicted oldest turns"
            );
        }
        evicted
    }

    /// Returns a snapshot of all turns in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Iterates over the turns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    /// Returns the current capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, clamped to the accepted range.
    ///
    /// Shrinking does not evict anything until the next [`append`].
    ///
    /// [`append`]: Self::append
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = clamp_limit(capacity);
    }

    /// Returns the number of buffered turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if no turns are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drops every buffered turn, keeping the capacity.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ContextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamps a requested context limit to `MIN_CONTEXT_LIMIT..=MAX_CONTEXT_LIMIT`.
#[must_use]
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(MIN_CONTEXT_LIMIT, MAX_CONTEXT_LIMIT)
}

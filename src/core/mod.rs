//! Core domain models for chatline.
//!
//! Conversation turns, the bounded context buffer, and request payload
//! construction. These are pure domain models with no I/O dependencies.

pub mod context;
pub mod payload;
pub mod turn;

pub use context::{
    ContextBuffer, DEFAULT_CONTEXT_LIMIT, MAX_CONTEXT_LIMIT, MIN_CONTEXT_LIMIT, clamp_limit,
};
pub use payload::{ChatRequest, PayloadBuilder};
pub use turn::{Role, Turn};

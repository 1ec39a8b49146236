//! # chatline
//!
//! Terminal chat client for OpenAI-compatible completion endpoints.
//!
//! chatline keeps a bounded window of earlier turns, sends it with each new
//! message in one HTTP request, and pulls the reply text out of the
//! response body incrementally, without parsing the JSON document.
//!
//! ## Features
//!
//! - **Bounded Context**: FIFO turn buffer with a configurable capacity
//! - **Incremental Extraction**: reply captured as bytes arrive, split
//!   multi-byte characters and escapes included
//! - **Pluggable Transport**: the HTTP call sits behind an async trait
//! - **Persistent Settings**: JSON settings file with safe defaults

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{Error, ExtractError, QueryError, Result};

// Re-export core domain types
pub use crate::core::{ChatRequest, ContextBuffer, PayloadBuilder, Role, Turn};

// Re-export extraction types
pub use io::{CONTENT_PATTERN, StreamExtractor, Utf8Decoder, extract, unescape_json};

// Re-export client types
pub use client::{HttpTransport, QueryOrchestrator, RequestGate, Session, Transport};

// Re-export settings
pub use config::{SettingKey, Settings};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};

//! CLI layer for chatline.
//!
//! Provides the command-line interface using clap, with commands for
//! asking one question, chatting interactively, extracting a reply from a
//! saved response, and managing settings.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::{execute, run_chat};
pub use output::OutputFormat;
pub use parser::{Cli, Commands, ConfigCommands};

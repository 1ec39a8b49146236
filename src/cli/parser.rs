//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::config::{SettingKey, default_settings_path};
use crate::error::Result;
use crate::io::CONTENT_PATTERN;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chatline: a terminal chat client for completion endpoints.
///
/// Sends your text with a bounded window of earlier turns and prints the
/// reply as soon as it has been read from the response.
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    ///
    /// Defaults to `chatline/settings.json` in the platform config directory.
    #[arg(short, long, env = "CHATLINE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API key to use instead of the stored one (not saved).
    #[arg(long, env = "CHATLINE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message and print the reply.
    Ask {
        /// Message text (words are joined with spaces).
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Model to use for this request.
        #[arg(short, long)]
        model: Option<String>,

        /// System instruction for this request.
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Chat interactively; one message per line.
    ///
    /// `/reset` forgets the conversation, `/quit` or end of input exits.
    Chat {
        /// Model to use for this conversation.
        #[arg(short, long)]
        model: Option<String>,

        /// System instruction for this conversation.
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Extract the reply from a saved response body.
    Extract {
        /// File holding the response body (reads stdin if omitted).
        file: Option<PathBuf>,

        /// Literal text that precedes the value.
        #[arg(short, long, default_value = CONTENT_PATTERN)]
        pattern: String,
    },

    /// Show or change settings.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Settings subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current settings (API key masked).
    Show,

    /// Print the settings file location.
    Path,

    /// Change one setting and save it.
    Set {
        /// Setting to change.
        #[arg(value_enum)]
        key: SettingKey,

        /// New value.
        value: String,
    },
}

impl Cli {
    /// Returns the settings path, using the default if not specified.
    ///
    /// # Errors
    ///
    /// Returns an error if no path was given and the platform has no
    /// config directory.
    pub fn get_config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_settings_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        // Test that CLI can be created
        Cli::command().debug_assert();
    }

    #[test]
    fn test_custom_config_path() {
        let cli = Cli {
            config: Some(PathBuf::from("/custom/settings.json")),
            api_key: None,
            verbose: false,
            format: "text".to_string(),
            command: Commands::Config(ConfigCommands::Path),
        };
        assert_eq!(
            cli.get_config_path().unwrap(),
            PathBuf::from("/custom/settings.json")
        );
    }

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::try_parse_from(["chatline", "ask", "hello", "there"]).unwrap();
        match cli.command {
            Commands::Ask { text, .. } => assert_eq!(text, vec!["hello", "there"]),
            other => unreachable!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_set_key() {
        let cli =
            Cli::try_parse_from(["chatline", "config", "set", "context-limit", "5"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Set { key, value }) => {
                assert_eq!(key, SettingKey::ContextLimit);
                assert_eq!(value, "5");
            }
            other => unreachable!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_setting() {
        let result = Cli::try_parse_from(["chatline", "config", "set", "colour", "red"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_default_pattern() {
        let cli = Cli::try_parse_from(["chatline", "extract"]).unwrap();
        match cli.command {
            Commands::Extract { file, pattern } => {
                assert!(file.is_none());
                assert_eq!(pattern, CONTENT_PATTERN);
            }
            other => unreachable!("unexpected command: {other:?}"),
        }
    }
}

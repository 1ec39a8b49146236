//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, format_error, format_message, format_reply, format_settings,
};
use crate::cli::parser::{Cli, Commands, ConfigCommands};
use crate::client::{HttpTransport, Session, Transport};
use crate::config::{SettingKey, Settings, mask_api_key};
use crate::error::{CommandError, Error, Result};
use crate::io::{extract_reader, open_input};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Chat line that clears the conversation.
pub const RESET_COMMAND: &str = "/reset";

/// Chat line that ends the session.
pub const QUIT_COMMAND: &str = "/quit";

/// Chat line prefix that replaces the system instruction.
pub const ROLE_COMMAND: &str = "/role";

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub async fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Ask { text, model, role } => {
            cmd_ask(cli, &text.join(" "), model.as_deref(), role.as_deref(), format).await
        }
        Commands::Chat { model, role } => {
            cmd_chat(cli, model.as_deref(), role.as_deref(), format).await
        }
        Commands::Extract { file, pattern } => cmd_extract(file.as_deref(), pattern, format),
        Commands::Config(sub) => {
            let path = cli.get_config_path()?;
            match sub {
                ConfigCommands::Show => cmd_config_show(&path, format),
                ConfigCommands::Path => Ok(format_message(&path.to_string_lossy(), format)),
                ConfigCommands::Set { key, value } => cmd_config_set(&path, *key, value, format),
            }
        }
    }
}

/// Loads settings and applies the per-invocation overrides.
fn load_settings(cli: &Cli, model: Option<&str>, role: Option<&str>) -> Result<Settings> {
    let path = cli.get_config_path()?;
    let mut settings = Settings::load_or_create(&path)?;

    if let Some(key) = &cli.api_key {
        settings.api_key.clone_from(key);
    }
    if let Some(model) = model {
        settings.model = model.to_string();
    }
    if let Some(role) = role {
        settings.system_role = role.to_string();
    }
    Ok(settings)
}

fn open_session(settings: &Settings) -> Result<Session<HttpTransport>> {
    let transport = HttpTransport::with_timeout(settings.request_timeout())?;
    Ok(Session::new(transport, settings))
}

async fn cmd_ask(
    cli: &Cli,
    text: &str,
    model: Option<&str>,
    role: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    if text.trim().is_empty() {
        return Err(CommandError::InvalidArgument("message text is empty".to_string()).into());
    }

    let settings = load_settings(cli, model, role)?;
    let mut session = open_session(&settings)?;
    let reply = session.submit(text).await?;
    Ok(format_reply(&reply, format))
}

async fn cmd_chat(
    cli: &Cli,
    model: Option<&str>,
    role: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let settings = load_settings(cli, model, role)?;
    let mut session = open_session(&settings)?;

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    let replies = run_chat(&mut session, input, &mut out, format).await?;
    tracing::info!(replies, "chat finished");
    Ok(String::new())
}

/// Runs an interactive conversation over line-oriented input.
///
/// Each non-empty line is sent as one message and its reply written to
/// `out`. [`RESET_COMMAND`] clears the context, `/role <text>` replaces the
/// system instruction, and [`QUIT_COMMAND`] or end of input stops the loop. Query failures are written to `out` and the
/// conversation continues; a throttled message waits out the gate once.
///
/// Returns the number of replies received.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run_chat<T, R, W>(
    session: &mut Session<T>,
    input: R,
    out: &mut W,
    format: OutputFormat,
) -> Result<usize>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut replies = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            QUIT_COMMAND => break,
            RESET_COMMAND => {
                session.reset();
                write!(out, "{}", format_message("Conversation cleared.", format))?;
                continue;
            }
            _ => {}
        }

        if let Some(rest) = line.strip_prefix(ROLE_COMMAND)
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            let role = rest.trim();
            let message = if role.is_empty() {
                "Usage: /role <instruction>"
            } else {
                session.set_system_role(role);
                "System role updated."
            };
            write!(out, "{}", format_message(message, format))?;
            out.flush()?;
            continue;
        }

        match submit_waiting(session, line).await {
            Ok(reply) => {
                replies += 1;
                write!(out, "{}", format_reply(&reply, format))?;
            }
            Err(e) => {
                tracing::debug!(error = %e, "chat message failed");
                match format {
                    OutputFormat::Text => writeln!(out, "Error: {}", format_error(&e, format))?,
                    OutputFormat::Json => write!(out, "{}", format_error(&e, format))?,
                }
            }
        }
        out.flush()?;
    }

    Ok(replies)
}

/// Submits `text`, sleeping through one throttle refusal.
async fn submit_waiting<T: Transport>(session: &mut Session<T>, text: &str) -> Result<String> {
    match session.submit(text).await {
        Err(Error::Throttled { wait_ms }) => {
            tracing::debug!(wait_ms, "waiting for the request gate");
            tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            session.submit(text).await
        }
        other => other,
    }
}

fn cmd_extract(file: Option<&Path>, pattern: &str, format: OutputFormat) -> Result<String> {
    if pattern.is_empty() {
        return Err(CommandError::InvalidArgument("pattern is empty".to_string()).into());
    }
    let reader = open_input(file)?;
    let reply = extract_reader(reader, pattern)?;
    Ok(format_reply(&reply, format))
}

fn cmd_config_show(path: &Path, format: OutputFormat) -> Result<String> {
    let settings = Settings::load_or_create(path)?;
    Ok(format_settings(&settings, path, format))
}

fn cmd_config_set(path: &Path, key: SettingKey, value: &str, format: OutputFormat) -> Result<String> {
    let mut settings = Settings::load_or_create(path)?;
    settings.set(key, value)?;
    settings.save(path)?;
    tracing::info!(key = key.as_str(), "setting updated");

    let shown = match key {
        SettingKey::ApiKey => mask_api_key(&settings.api_key),
        SettingKey::ContextLimit => settings.context_limit.to_string(),
        _ => value.trim().to_string(),
    };
    Ok(format_message(&format!("{} = {shown}", key.as_str()), format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use tempfile::TempDir;

    fn cli_for(path: &Path, command: Commands) -> Cli {
        Cli {
            config: Some(path.to_path_buf()),
            api_key: None,
            verbose: false,
            format: "text".to_string(),
            command,
        }
    }

    #[tokio::test]
    async fn test_config_set_clamps_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        let cli = cli_for(
            &path,
            Commands::Config(ConfigCommands::Set {
                key: SettingKey::ContextLimit,
                value: "99".to_string(),
            }),
        );

        let output = execute(&cli).await.unwrap();
        assert_eq!(output, "context-limit = 25\n");
        assert_eq!(Settings::load(&path).unwrap().context_limit, 25);
    }

    #[tokio::test]
    async fn test_ask_without_key_fails_before_network() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        let cli = cli_for(
            &path,
            Commands::Ask {
                text: vec!["hello".to_string()],
                model: None,
                role: None,
            },
        );

        let err = execute(&cli).await.unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        let cli = cli_for(
            &path,
            Commands::Ask {
                text: vec!["  ".to_string()],
                model: None,
                role: None,
            },
        );

        let err = execute(&cli).await.unwrap_err();
        assert!(matches!(err, Error::Command(CommandError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let body = temp_dir.path().join("body.json");
        std::fs::write(&body, r#"{"content": "x"}"#).unwrap();
        let cli = cli_for(
            &temp_dir.path().join("settings.json"),
            Commands::Extract {
                file: Some(body),
                pattern: String::new(),
            },
        );

        let err = execute(&cli).await.unwrap_err();
        assert!(matches!(err, Error::Command(CommandError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_extract_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let body = temp_dir.path().join("body.json");
        std::fs::write(&body, r#"{"message": {"content": "saved \"reply\""}}"#).unwrap();
        let cli = cli_for(
            &temp_dir.path().join("settings.json"),
            Commands::Extract {
                file: Some(body),
                pattern: crate::io::CONTENT_PATTERN.to_string(),
            },
        );

        assert_eq!(execute(&cli).await.unwrap(), "saved \"reply\"\n");
    }
}

//! Persisted client settings.
//!
//! Settings live in a JSON file, by default
//! `<config dir>/chatline/settings.json`. A missing file is created with
//! defaults on first load. Unknown fields are ignored and missing fields
//! fall back to their defaults, so older files keep loading.

use crate::core::{DEFAULT_CONTEXT_LIMIT, MAX_CONTEXT_LIMIT, clamp_limit};
use crate::error::{ConfigError, Error, Result};
use crate::io::{read_file, write_file};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Value stored in a fresh settings file instead of a real key.
pub const PLACEHOLDER_API_KEY: &str = "No API key.";

/// Default completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default system instruction sent with every request.
pub const DEFAULT_SYSTEM_ROLE: &str = "You are a helpful assistant.";

/// Default minimum number of seconds between two requests.
pub const DEFAULT_MIN_INTERVAL_SECS: u64 = 3;

/// Directory name under the platform config dir.
const APP_DIR: &str = "chatline";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.json";

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bearer credential for the endpoint.
    pub api_key: String,

    /// Number of turns kept as conversational context (1..=25).
    pub context_limit: usize,

    /// System instruction sent with every request.
    pub system_role: String,

    /// Chat-completion endpoint URL.
    pub endpoint: String,

    /// Model identifier.
    pub model: String,

    /// Minimum seconds between the end of one request and the next.
    pub min_interval_secs: u64,

    /// Whole-request timeout in seconds; `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            context_limit: DEFAULT_CONTEXT_LIMIT,
            system_role: DEFAULT_SYSTEM_ROLE.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            min_interval_secs: DEFAULT_MIN_INTERVAL_SECS,
            request_timeout_secs: None,
        }
    }
}

/// Names accepted by `chatline config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    /// The API key.
    ApiKey,
    /// The system instruction.
    Role,
    /// The context limit.
    ContextLimit,
    /// The endpoint URL.
    Endpoint,
    /// The model identifier.
    Model,
    /// The minimum request interval in seconds.
    MinInterval,
    /// The request timeout in seconds (0 disables it).
    Timeout,
}

impl SettingKey {
    /// Returns the name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiKey => "api-key",
            Self::Role => "role",
            Self::ContextLimit => "context-limit",
            Self::Endpoint => "endpoint",
            Self::Model => "model",
            Self::MinInterval => "min-interval",
            Self::Timeout => "timeout",
        }
    }
}

impl Settings {
    /// Loads settings from `path`, writing defaults there if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or created.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        tracing::info!(path = %path.display(), "no settings file, writing defaults");
        let settings = Self::default();
        settings.save(path)?;
        Ok(settings)
    }

    /// Loads settings from `path`.
    ///
    /// An out-of-range context limit is clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_file(path)?;
        let mut settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;
        settings.context_limit = clamp_limit(settings.context_limit);
        Ok(settings)
    }

    /// Writes the settings to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::from)?;
        write_file(path, &json)
    }

    /// Updates one setting from its command-line string form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value cannot be used.
    pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        match key {
            SettingKey::ApiKey => self.api_key = value.trim().to_string(),
            SettingKey::Role => self.system_role = value.to_string(),
            SettingKey::ContextLimit => {
                let requested: i64 = parse_number(key, value)?;
                self.context_limit =
                    usize::try_from(requested.max(0)).map_or(MAX_CONTEXT_LIMIT, clamp_limit);
            }
            SettingKey::Endpoint => {
                let trimmed = value.trim();
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(invalid(key, value, "expected an http(s) URL"));
                }
                self.endpoint = trimmed.to_string();
            }
            SettingKey::Model => {
                if value.trim().is_empty() {
                    return Err(invalid(key, value, "model must not be empty"));
                }
                self.model = value.trim().to_string();
            }
            SettingKey::MinInterval => self.min_interval_secs = parse_number(key, value)?,
            SettingKey::Timeout => {
                let secs: u64 = parse_number(key, value)?;
                self.request_timeout_secs = (secs > 0).then_some(secs);
            }
        }
        Ok(())
    }

    /// Returns the minimum interval between requests.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_secs)
    }

    /// Returns the request timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Returns `true` unless `key` is blank or the placeholder.
#[must_use]
pub fn is_usable_api_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

/// Returns the default settings path under the platform config directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if the platform has none.
pub fn default_settings_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
        .ok_or_else(|| ConfigError::NoConfigDir.into())
}

/// Masks an API key for display, keeping only the last four chars.
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if !is_usable_api_key(key) {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

fn parse_number<T: std::str::FromStr>(key: SettingKey, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, value, "expected a whole number"))
}

fn invalid(key: SettingKey, value: &str, reason: &str) -> Error {
    ConfigError::InvalidValue {
        key: key.as_str().to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

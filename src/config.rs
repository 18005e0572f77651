//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{AppError, Result};

/// Keyring service name under which credentials may be stored.
const KEYRING_SERVICE: &str = "pr-approve-bot";

/// How Slack delivers events to the bot.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlackTransport {
    /// Socket Mode over a websocket opened with the app-level token.
    #[default]
    Socket,
    /// Events API requests posted to `/slack/events`, verified with the
    /// signing secret.
    Http,
}

/// Nested Slack configuration.
///
/// Tokens are loaded at runtime via OS keychain or environment variables,
/// never from the TOML config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct SlackConfig {
    /// Event delivery transport.
    pub transport: SlackTransport,
    /// Slack user id of the workspace owner the bot acts for.
    pub owner_user_id: Option<String>,
    /// Channel in which every message is considered for approval.
    pub allowed_channel_id: Option<String>,
    /// Bot user token used for reactions and `auth.test` (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
    /// App-level token used for Socket Mode (populated at runtime).
    #[serde(skip)]
    pub app_token: String,
    /// Request signing secret for the Events API (populated at runtime).
    #[serde(skip)]
    pub signing_secret: String,
    /// Optional user token used to react where the bot cannot.
    #[serde(skip)]
    pub user_token: Option<String>,
}

/// GitHub API settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Base URL of the REST API.
    pub api_base_url: String,
    /// Host that pull request URLs must point at.
    pub host: String,
    /// Per-request timeout for review submissions.
    pub request_timeout_seconds: u64,
    /// Personal access token (populated at runtime).
    #[serde(skip)]
    pub token: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".into(),
            host: "github.com".into(),
            request_timeout_seconds: 30,
            token: String::new(),
        }
    }
}

impl GitHubConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Message processing knobs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct ProcessingConfig {
    /// Delay before every approval call.
    pub pacing_millis: u64,
    /// Soft cap on remembered message keys.
    pub dedup_capacity: usize,
    /// Number of oldest keys dropped once the cap is exceeded.
    pub dedup_evict_batch: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            pacing_millis: 1000,
            dedup_capacity: 1000,
            dedup_evict_batch: 500,
        }
    }
}

impl ProcessingConfig {
    /// Pacing delay as a [`Duration`].
    #[must_use]
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_millis)
    }
}

fn default_http_port() -> u16 {
    3000
}

/// Global configuration parsed from an optional `config.toml`, the
/// environment, and the OS keychain.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Port for the health probe and, in HTTP mode, the Events API endpoint.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Slack connectivity settings.
    #[serde(default)]
    pub slack: SlackConfig,
    /// GitHub connectivity settings.
    #[serde(default)]
    pub github: GitHubConfig,
    /// Pacing and dedup settings.
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            slack: SlackConfig::default(),
            github: GitHubConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply plain environment overrides (`PORT`, `OWNER_USER_ID`,
    /// `ALLOWED_CHANNEL_ID`). Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(port) = non_empty_env("PORT") {
            self.http_port = port
                .parse()
                .map_err(|err| AppError::Config(format!("invalid PORT {port:?}: {err}")))?;
        }
        if let Some(owner) = non_empty_env("OWNER_USER_ID") {
            self.slack.owner_user_id = Some(owner);
        }
        if let Some(channel) = non_empty_env("ALLOWED_CHANNEL_ID") {
            self.slack.allowed_channel_id = Some(channel);
        }
        Ok(())
    }

    /// Load secrets from OS keychain with env-var fallback.
    ///
    /// `SLACK_BOT_TOKEN` and `GITHUB_TOKEN` are always required. Socket
    /// Mode additionally requires `SLACK_APP_TOKEN`; the HTTP transport
    /// requires `SLACK_SIGNING_SECRET`. `SLACK_USER_TOKEN` is optional.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required credential is missing.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_BOT_TOKEN").await?;
        self.github.token = load_credential("github_token", "GITHUB_TOKEN").await?;

        match self.slack.transport {
            SlackTransport::Socket => {
                self.slack.app_token =
                    load_credential("slack_app_token", "SLACK_APP_TOKEN").await?;
            }
            SlackTransport::Http => {
                self.slack.signing_secret =
                    load_credential("slack_signing_secret", "SLACK_SIGNING_SECRET").await?;
            }
        }

        self.slack.user_token = load_credential("slack_user_token", "SLACK_USER_TOKEN")
            .await
            .ok();
        if self.slack.user_token.is_none() {
            debug!("no delegated user token configured");
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let processing = &self.processing;
        if processing.dedup_capacity == 0 {
            return Err(AppError::Config(
                "dedup_capacity must be greater than zero".into(),
            ));
        }
        if processing.dedup_evict_batch == 0
            || processing.dedup_evict_batch > processing.dedup_capacity
        {
            return Err(AppError::Config(
                "dedup_evict_batch must be between 1 and dedup_capacity".into(),
            ));
        }
        if self.github.host.trim().is_empty() {
            return Err(AppError::Config("github.host must not be empty".into()));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            debug!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    non_empty_env(env_key).ok_or_else(|| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}

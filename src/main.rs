#![forbid(unsafe_code)]

//! `pr-approve-bot` binary.
//!
//! Loads configuration, resolves the bot identity, wires the message
//! processor, and starts the Slack transport plus the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use pr_approve_bot::app::{AppState, Collaborators};
use pr_approve_bot::clock::TokioClock;
use pr_approve_bot::config::{GlobalConfig, SlackTransport};
use pr_approve_bot::github::GitHubClient;
use pr_approve_bot::slack::client::SlackService;
use pr_approve_bot::slack::reactions::ReactionApi;
use pr_approve_bot::{http, AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pr-approve-bot", about = "Approve GitHub pull requests linked in Slack", version, long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let dotenv = dotenvy::dotenv();
    init_tracing(args.log_format)?;
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }
    info!("pr-approve-bot bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = match args.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    config.apply_env_overrides()?;
    config.load_credentials().await?;
    let config = Arc::new(config);
    info!(transport = ?config.slack.transport, "configuration loaded");

    // ── Slack identity and collaborators ────────────────
    let slack = SlackService::new(&config.slack)?;
    let bot_user_id = slack.resolve_bot_user_id().await?;
    let delegated_reactor = slack
        .user_reactor()
        .map(|reactor| Arc::new(reactor) as Arc<dyn ReactionApi>);

    let state = Arc::new(AppState::build(
        Arc::clone(&config),
        &bot_user_id,
        Collaborators {
            approvals: Arc::new(GitHubClient::from_config(&config.github)),
            primary_reactor: Arc::new(slack.bot_reactor()),
            delegated_reactor,
            clock: Arc::new(TokioClock),
        },
    )?);

    // ── Start transports ────────────────────────────────
    let ct = CancellationToken::new();
    let listener = http::bind(config.http_port).await?;
    let http_ct = ct.clone();
    let http_state = Arc::clone(&state);
    let http_handle = tokio::spawn(async move {
        if let Err(err) = http::serve(listener, http_state, http_ct).await {
            error!(%err, "http server failed");
        }
    });

    let socket_handle = match config.slack.transport {
        SlackTransport::Socket => Some(slack.spawn_socket_mode(Arc::clone(&state))),
        SlackTransport::Http => None,
    };

    info!(
        owner = config.slack.owner_user_id.as_deref().unwrap_or("<unset>"),
        allowed_channel = config.slack.allowed_channel_id.as_deref().unwrap_or("<unset>"),
        "pr-approve-bot running; accepting pull requests from direct messages"
    );

    // ── Wait for shutdown signal ────────────────────────
    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    if let Some(handle) = socket_handle {
        handle.abort();
    }
    let _ = http_handle.await;
    info!("pr-approve-bot shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}

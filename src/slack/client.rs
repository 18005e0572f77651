//! Slack client construction, identity lookup, and Socket Mode listener.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackApiToken, SlackApiTokenType, SlackApiTokenValue, SlackClient,
    SlackClientEventsListenerEnvironment, SlackClientHyperHttpsConnector,
    SlackClientSocketModeConfig, SlackClientSocketModeListener, SlackSocketModeListenerCallbacks,
};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::events;
use super::reactions::SlackReactor;
use crate::app::AppState;
use crate::{config::SlackConfig, AppError, Result};

/// Hyper-backed Slack client.
pub type SlackHyperClient = SlackClient<SlackClientHyperHttpsConnector>;

fn api_token(value: &str, token_type: SlackApiTokenType) -> SlackApiToken {
    SlackApiToken {
        token_value: SlackApiTokenValue(value.to_owned()),
        cookie: None,
        team_id: None,
        scope: None,
        token_type: Some(token_type),
    }
}

/// Slack API access for the bot and, optionally, the delegated user.
pub struct SlackService {
    client: Arc<SlackHyperClient>,
    bot_token: SlackApiToken,
    user_token: Option<SlackApiToken>,
    app_token: SlackApiToken,
}

impl SlackService {
    /// Create the HTTPS client and tokens from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the HTTPS connector cannot be created.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let connector = SlackClientHyperHttpsConnector::new()
            .map_err(|err| AppError::Slack(format!("failed to init slack connector: {err}")))?;
        Ok(Self {
            client: Arc::new(SlackClient::new(connector)),
            bot_token: api_token(&config.bot_token, SlackApiTokenType::Bot),
            user_token: config
                .user_token
                .as_deref()
                .map(|token| api_token(token, SlackApiTokenType::User)),
            app_token: api_token(&config.app_token, SlackApiTokenType::App),
        })
    }

    /// Look up the bot's own user id via `auth.test`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the bot token is rejected.
    pub async fn resolve_bot_user_id(&self) -> Result<String> {
        let response = self
            .client
            .open_session(&self.bot_token)
            .auth_test()
            .await
            .map_err(|err| AppError::Slack(format!("auth.test failed: {err}")))?;
        let user_id = response.user_id.to_string();
        info!(bot_user_id = %user_id, "resolved bot identity");
        Ok(user_id)
    }

    /// Reactor posting as the bot.
    #[must_use]
    pub fn bot_reactor(&self) -> SlackReactor {
        SlackReactor::new(Arc::clone(&self.client), self.bot_token.clone())
    }

    /// Reactor posting as the delegated user, when a user token is configured.
    #[must_use]
    pub fn user_reactor(&self) -> Option<SlackReactor> {
        self.user_token
            .clone()
            .map(|token| SlackReactor::new(Arc::clone(&self.client), token))
    }

    /// Spawn the Socket Mode listener delivering push events to
    /// [`events::handle_push_event`] with `state` as listener user state.
    #[must_use]
    pub fn spawn_socket_mode(&self, state: Arc<AppState>) -> JoinHandle<()> {
        let listener_env = Arc::new(
            SlackClientEventsListenerEnvironment::new(Arc::clone(&self.client))
                .with_error_handler(|err, _client, _state| {
                    error!(?err, "socket mode error");
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR
                })
                .with_user_state(state),
        );
        let callbacks = SlackSocketModeListenerCallbacks::new()
            .with_hello_events(|event, _client, _state| async move {
                info!(?event, "socket hello");
            })
            .with_push_events(events::handle_push_event);
        let config = SlackClientSocketModeConfig {
            max_connections_count: SlackClientSocketModeConfig::DEFAULT_CONNECTIONS_COUNT,
            debug_connections: SlackClientSocketModeConfig::DEFAULT_DEBUG_CONNECTIONS,
            initial_backoff_in_seconds:
                SlackClientSocketModeConfig::DEFAULT_INITIAL_BACKOFF_IN_SECONDS,
            reconnect_timeout_in_seconds:
                SlackClientSocketModeConfig::DEFAULT_RECONNECT_TIMEOUT_IN_SECONDS,
            ping_interval_in_seconds: SlackClientSocketModeConfig::DEFAULT_PING_INTERVAL_IN_SECONDS,
            ping_failure_threshold_times:
                SlackClientSocketModeConfig::DEFAULT_PING_FAILURE_THRESHOLD_TIMES,
        };

        let listener = SlackClientSocketModeListener::new(&config, listener_env, callbacks);
        let app_token = self.app_token.clone();
        tokio::spawn(async move {
            if let Err(error) = listener.listen_for(&app_token).await {
                error!(?error, "socket mode listen failed");
                return;
            }

            listener.serve().await;
            info!("socket mode listener exited");
        })
    }
}

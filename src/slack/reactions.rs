//! Best-effort acknowledgement reactions.
//!
//! [`AckDispatcher::acknowledge`] returns an [`AckOutcome`], never an
//! error: a reaction that cannot be posted is logged and dropped so it can
//! never stall processing of later pull requests or messages.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use slack_morphism::prelude::{
    SlackApiReactionsAddRequest, SlackApiToken, SlackChannelId, SlackReactionName, SlackTs,
};
use tracing::{debug, info};

use super::client::SlackHyperClient;
use crate::models::review::ProcessingOutcome;
use crate::routing::AckIdentity;
use crate::{AppError, Result};

/// Reaction posted when the pull request was approved.
pub const APPROVED_REACTION: &str = "white_check_mark";

/// Reaction posted when the approval failed.
pub const FAILED_REACTION: &str = "x";

/// Remote API able to add a reaction to a message.
pub trait ReactionApi: Send + Sync {
    /// Add reaction `name` to the message `ts` in `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`] if the reaction is rejected.
    fn add_reaction<'a>(
        &'a self,
        channel: &'a str,
        ts: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// [`ReactionApi`] calling Slack `reactions.add` with one fixed token.
pub struct SlackReactor {
    client: Arc<SlackHyperClient>,
    token: SlackApiToken,
}

impl SlackReactor {
    /// Bind `client` to `token`.
    #[must_use]
    pub fn new(client: Arc<SlackHyperClient>, token: SlackApiToken) -> Self {
        Self { client, token }
    }
}

impl ReactionApi for SlackReactor {
    fn add_reaction<'a>(
        &'a self,
        channel: &'a str,
        ts: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let request = SlackApiReactionsAddRequest::new(
                SlackChannelId(channel.to_owned()),
                SlackReactionName(name.to_owned()),
                SlackTs(ts.to_owned()),
            );
            self.client
                .open_session(&self.token)
                .reactions_add(&request)
                .await
                .map_err(|err| AppError::Slack(format!("failed to add reaction: {err}")))?;
            Ok(())
        })
    }
}

/// What happened to an acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    /// The reaction was added.
    Posted {
        /// Reaction name.
        reaction: &'static str,
    },
    /// The reaction could not be added and was dropped.
    Dropped {
        /// Why it was dropped.
        reason: String,
    },
}

/// Posts outcome reactions with the identity chosen by routing.
#[derive(Clone)]
pub struct AckDispatcher {
    primary: Arc<dyn ReactionApi>,
    delegated: Option<Arc<dyn ReactionApi>>,
}

impl AckDispatcher {
    /// Create a dispatcher. Without a `delegated` reactor, delegated
    /// acknowledgements fall back to `primary`.
    #[must_use]
    pub fn new(primary: Arc<dyn ReactionApi>, delegated: Option<Arc<dyn ReactionApi>>) -> Self {
        Self { primary, delegated }
    }

    /// React on `ts` in `channel` with the symbol for `outcome`.
    pub async fn acknowledge(
        &self,
        channel: &str,
        ts: &str,
        outcome: &ProcessingOutcome,
        identity: AckIdentity,
    ) -> AckOutcome {
        let reaction = if outcome.success {
            APPROVED_REACTION
        } else {
            FAILED_REACTION
        };

        let reactor = match (identity, &self.delegated) {
            (AckIdentity::Delegated, Some(delegated)) => delegated,
            (AckIdentity::Delegated, None) => {
                debug!("no delegated reactor configured; using bot identity");
                &self.primary
            }
            (AckIdentity::Primary, _) => &self.primary,
        };

        match reactor.add_reaction(channel, ts, reaction).await {
            Ok(()) => {
                info!(channel, ts, reaction, ?identity, "acknowledged message");
                AckOutcome::Posted { reaction }
            }
            Err(err) => {
                debug!(channel, ts, reaction, %err, "reaction failed (ignored)");
                AckOutcome::Dropped {
                    reason: err.to_string(),
                }
            }
        }
    }
}

//! Decides whether an inbound message is acted on and which identity
//! acknowledges it.
//!
//! Rules are evaluated after a self/automated-message gate:
//!
//! 1. Direct messages are processed. The reaction is posted with the
//!    delegated identity when an owner is configured and someone else sent
//!    the message, otherwise with the bot identity.
//! 2. Group direct messages are processed with the bot identity.
//! 3. Messages in the configured allowed channel are processed with the bot
//!    identity.
//!
//! Anything else is dropped without side effects.

use tracing::debug;

use crate::models::event::{ChannelKind, InboundEvent};

/// Credential used to post the acknowledgement reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckIdentity {
    /// The bot token.
    Primary,
    /// The owner's user token.
    Delegated,
}

/// Outcome of routing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Whether the message should be processed at all.
    pub should_process: bool,
    /// Identity to acknowledge with when processed.
    pub identity: AckIdentity,
}

impl RoutingDecision {
    fn accept(identity: AckIdentity) -> Self {
        Self {
            should_process: true,
            identity,
        }
    }

    fn reject() -> Self {
        Self {
            should_process: false,
            identity: AckIdentity::Primary,
        }
    }
}

/// Routing rules bound to the bot's identity and configuration.
#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    bot_user_id: String,
    owner_user_id: Option<String>,
    allowed_channel_id: Option<String>,
}

impl RoutingPolicy {
    /// Create a policy for the bot user `bot_user_id`.
    pub fn new(
        bot_user_id: impl Into<String>,
        owner_user_id: Option<String>,
        allowed_channel_id: Option<String>,
    ) -> Self {
        Self {
            bot_user_id: bot_user_id.into(),
            owner_user_id: owner_user_id.filter(|id| !id.is_empty()),
            allowed_channel_id: allowed_channel_id.filter(|id| !id.is_empty()),
        }
    }

    /// Route `event`.
    #[must_use]
    pub fn decide(&self, event: &InboundEvent) -> RoutingDecision {
        if event.automated || event.sender_id == self.bot_user_id {
            debug!(channel = %event.channel_id, ts = %event.ts, "ignoring bot or automated message");
            return RoutingDecision::reject();
        }
        if event.channel_id.is_empty() || event.sender_id.is_empty() || event.ts.is_empty() {
            debug!("ignoring message with missing routing fields");
            return RoutingDecision::reject();
        }

        match event.channel_kind {
            ChannelKind::Direct => {
                let delegated = self
                    .owner_user_id
                    .as_deref()
                    .is_some_and(|owner| owner != event.sender_id);
                RoutingDecision::accept(if delegated {
                    AckIdentity::Delegated
                } else {
                    AckIdentity::Primary
                })
            }
            ChannelKind::Group => RoutingDecision::accept(AckIdentity::Primary),
            ChannelKind::Channel
                if self.allowed_channel_id.as_deref() == Some(event.channel_id.as_str()) =>
            {
                RoutingDecision::accept(AckIdentity::Primary)
            }
            ChannelKind::Channel => RoutingDecision::reject(),
        }
    }
}

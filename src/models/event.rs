//! Inbound chat message model.

/// Kind of conversation a message was posted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// One-to-one direct message with the bot (Slack `im`).
    Direct,
    /// Multi-person direct message (Slack `mpim`).
    Group,
    /// Public or private named channel (Slack `channel` / `group`).
    Channel,
}

impl ChannelKind {
    /// Map a Slack `channel_type` value onto a [`ChannelKind`].
    ///
    /// Returns `None` for values Slack may add later, which are never routed.
    #[must_use]
    pub fn from_slack(channel_type: &str) -> Option<Self> {
        match channel_type {
            "im" => Some(Self::Direct),
            "mpim" => Some(Self::Group),
            "channel" | "group" => Some(Self::Channel),
            _ => None,
        }
    }
}

/// A single message delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Conversation the message was posted in.
    pub channel_id: String,
    /// Conversation kind.
    pub channel_kind: ChannelKind,
    /// Slack user id of the author.
    pub sender_id: String,
    /// Message timestamp, unique within the channel.
    pub ts: String,
    /// Raw message text.
    pub text: String,
    /// Set for bot posts and system subtypes (edits, joins, ...).
    pub automated: bool,
}

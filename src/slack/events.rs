//! Slack push event intake.
//!
//! Socket Mode and the Events API endpoint both funnel message events
//! through [`dispatch_event`]. Each processable message is handed to the
//! [`MessageProcessor`](crate::processor::MessageProcessor) on its own task
//! so the transport acknowledgement never waits on approval pacing.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackClientEventsUserState, SlackEventCallbackBody, SlackMessageEvent, SlackMessageEventType,
    SlackPushEventCallback,
};
use tracing::{debug, warn};

use super::client::SlackHyperClient;
use crate::app::AppState;
use crate::models::event::{ChannelKind, InboundEvent};

/// Socket Mode push event callback.
///
/// # Errors
///
/// Never fails; malformed or unexpected events are dropped.
pub async fn handle_push_event(
    event: SlackPushEventCallback,
    _client: Arc<SlackHyperClient>,
    state: SlackClientEventsUserState,
) -> slack_morphism::UserCallbackResult<()> {
    let app_state: Option<Arc<AppState>> = {
        let guard = state.read().await;
        guard.get_user_state::<Arc<AppState>>().cloned()
    };

    let Some(app) = app_state else {
        warn!("app state not available; dropping push event");
        return Ok(());
    };

    dispatch_event(&app, event.event);
    Ok(())
}

/// Route one event callback body. Only message events are acted on.
pub fn dispatch_event(app: &Arc<AppState>, body: SlackEventCallbackBody) {
    match body {
        SlackEventCallbackBody::Message(message) => dispatch_message(app, &message),
        _ => debug!("ignoring non-message push event"),
    }
}

/// Convert `message` and spawn its processing.
pub fn dispatch_message(app: &Arc<AppState>, message: &SlackMessageEvent) {
    let Some(inbound) = inbound_from_message(message) else {
        debug!(ts = %message.origin.ts, "ignoring message without routable fields");
        return;
    };

    let processor = Arc::clone(&app.processor);
    tokio::spawn(async move {
        let disposition = processor.handle(&inbound).await;
        debug!(
            channel = %inbound.channel_id,
            ts = %inbound.ts,
            ?disposition,
            "message handled"
        );
    });
}

/// Build an [`InboundEvent`] from a Slack message event.
///
/// Returns `None` when the channel, channel type, or author is missing,
/// or the channel type is unknown. Only bot posts count as automated;
/// user subtypes such as `file_share` or `me_message` are kept.
#[must_use]
pub fn inbound_from_message(message: &SlackMessageEvent) -> Option<InboundEvent> {
    let channel_id = message.origin.channel.as_ref()?.to_string();
    let channel_kind = message
        .origin
        .channel_type
        .as_ref()
        .and_then(|kind| ChannelKind::from_slack(&kind.to_string()))?;
    let sender_id = message.sender.user.as_ref()?.to_string();
    let text = message
        .content
        .as_ref()
        .and_then(|content| content.text.clone())
        .unwrap_or_default();

    Some(InboundEvent {
        channel_id,
        channel_kind,
        sender_id,
        ts: message.origin.ts.to_string(),
        text,
        automated: message.sender.bot_id.is_some()
            || matches!(message.subtype, Some(SlackMessageEventType::BotMessage)),
    })
}

//! Unit tests for the routing policy.

use pr_approve_bot::models::event::{ChannelKind, InboundEvent};
use pr_approve_bot::routing::{AckIdentity, RoutingPolicy};

const BOT: &str = "UBOT";
const OWNER: &str = "UOWNER";
const ALLOWED: &str = "CALLOWED";

fn policy() -> RoutingPolicy {
    RoutingPolicy::new(BOT, Some(OWNER.into()), Some(ALLOWED.into()))
}

fn event(kind: ChannelKind, channel: &str, sender: &str) -> InboundEvent {
    InboundEvent {
        channel_id: channel.into(),
        channel_kind: kind,
        sender_id: sender.into(),
        ts: "1700000000.000100".into(),
        text: "https://github.com/acme/widgets/pull/42".into(),
        automated: false,
    }
}

#[test]
fn direct_message_from_non_owner_uses_delegated_identity() {
    let decision = policy().decide(&event(ChannelKind::Direct, "D1", "UALICE"));
    assert!(decision.should_process);
    assert_eq!(decision.identity, AckIdentity::Delegated);
}

#[test]
fn direct_message_from_owner_uses_primary_identity() {
    let decision = policy().decide(&event(ChannelKind::Direct, "D1", OWNER));
    assert!(decision.should_process);
    assert_eq!(decision.identity, AckIdentity::Primary);
}

#[test]
fn direct_message_without_configured_owner_uses_primary_identity() {
    let policy = RoutingPolicy::new(BOT, None, None);
    let decision = policy.decide(&event(ChannelKind::Direct, "D1", "UALICE"));
    assert!(decision.should_process);
    assert_eq!(decision.identity, AckIdentity::Primary);
}

#[test]
fn group_direct_message_is_processed_with_primary_identity() {
    let decision = policy().decide(&event(ChannelKind::Group, "G1", "UALICE"));
    assert!(decision.should_process);
    assert_eq!(decision.identity, AckIdentity::Primary);
}

#[test]
fn allowed_channel_is_processed_with_primary_identity() {
    let decision = policy().decide(&event(ChannelKind::Channel, ALLOWED, "UALICE"));
    assert!(decision.should_process);
    assert_eq!(decision.identity, AckIdentity::Primary);
}

#[test]
fn other_channels_are_dropped() {
    let decision = policy().decide(&event(ChannelKind::Channel, "CRANDOM", "UALICE"));
    assert!(!decision.should_process);
}

#[test]
fn channels_are_dropped_when_no_allowed_channel_configured() {
    let policy = RoutingPolicy::new(BOT, Some(OWNER.into()), Some(String::new()));
    let decision = policy.decide(&event(ChannelKind::Channel, "CANY", "UALICE"));
    assert!(!decision.should_process);
}

#[test]
fn bot_messages_are_rejected_in_every_context() {
    for (kind, channel) in [
        (ChannelKind::Direct, "D1"),
        (ChannelKind::Group, "G1"),
        (ChannelKind::Channel, ALLOWED),
    ] {
        let decision = policy().decide(&event(kind, channel, BOT));
        assert!(!decision.should_process, "{kind:?} from bot must be rejected");
    }
}

#[test]
fn automated_messages_are_rejected() {
    let mut automated = event(ChannelKind::Direct, "D1", "UALICE");
    automated.automated = true;
    assert!(!policy().decide(&automated).should_process);
}

#[test]
fn missing_timestamp_is_rejected() {
    let mut incomplete = event(ChannelKind::Direct, "D1", "UALICE");
    incomplete.ts = String::new();
    assert!(!policy().decide(&incomplete).should_process);
}

#[test]
fn slack_channel_types_map_to_kinds() {
    assert_eq!(ChannelKind::from_slack("im"), Some(ChannelKind::Direct));
    assert_eq!(ChannelKind::from_slack("mpim"), Some(ChannelKind::Group));
    assert_eq!(ChannelKind::from_slack("channel"), Some(ChannelKind::Channel));
    assert_eq!(ChannelKind::from_slack("group"), Some(ChannelKind::Channel));
    assert_eq!(ChannelKind::from_slack("app_home"), None);
}

//! Per-message orchestration: route, claim, extract, pace, approve, react.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, info_span, Instrument};

use crate::clock::Clock;
use crate::dedup::{DedupCache, DedupKey};
use crate::extract::PrUrlExtractor;
use crate::github::ApprovalClient;
use crate::models::event::InboundEvent;
use crate::routing::RoutingPolicy;
use crate::slack::reactions::AckDispatcher;

/// What [`MessageProcessor::handle`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Routing rejected the message.
    Ignored,
    /// The message was already claimed by an earlier delivery.
    Duplicate,
    /// The message contained no pull request URLs.
    NoReferences,
    /// Pull requests were processed.
    Processed {
        /// Approvals that succeeded.
        approved: usize,
        /// Approvals that failed.
        failed: usize,
    },
}

/// Collaborators wired into a [`MessageProcessor`].
pub struct ProcessorParts {
    /// Routing rules.
    pub policy: RoutingPolicy,
    /// Shared dedup cache.
    pub dedup: Arc<DedupCache>,
    /// URL extractor.
    pub extractor: PrUrlExtractor,
    /// Approval front.
    pub approvals: ApprovalClient,
    /// Reaction dispatcher.
    pub acks: AckDispatcher,
    /// Pacing clock.
    pub clock: Arc<dyn Clock>,
    /// Delay before each approval.
    pub pacing: Duration,
}

/// Handles inbound messages end to end.
pub struct MessageProcessor {
    policy: RoutingPolicy,
    dedup: Arc<DedupCache>,
    extractor: PrUrlExtractor,
    approvals: ApprovalClient,
    acks: AckDispatcher,
    clock: Arc<dyn Clock>,
    pacing: Duration,
}

impl MessageProcessor {
    /// Assemble a processor from its collaborators.
    #[must_use]
    pub fn new(parts: ProcessorParts) -> Self {
        Self {
            policy: parts.policy,
            dedup: parts.dedup,
            extractor: parts.extractor,
            approvals: parts.approvals,
            acks: parts.acks,
            clock: parts.clock,
            pacing: parts.pacing,
        }
    }

    /// Process one message.
    ///
    /// The dedup key is claimed before any remote call, so a concurrent
    /// redelivery of the same message is rejected while approvals are in
    /// flight. Pull requests are approved one after another, each preceded
    /// by the pacing delay; a failed approval does not stop the rest.
    pub async fn handle(&self, event: &InboundEvent) -> Disposition {
        let span = info_span!("handle_message", channel = %event.channel_id, ts = %event.ts);
        self.handle_inner(event).instrument(span).await
    }

    async fn handle_inner(&self, event: &InboundEvent) -> Disposition {
        let decision = self.policy.decide(event);
        if !decision.should_process {
            return Disposition::Ignored;
        }

        let key = DedupKey::for_event(event);
        if !self.dedup.check_and_mark(key) {
            debug!("message already handled");
            return Disposition::Duplicate;
        }

        let pull_requests = self.extractor.extract(&event.text);
        if pull_requests.is_empty() {
            return Disposition::NoReferences;
        }

        let (mut approved, mut failed) = (0, 0);
        for pull_request in &pull_requests {
            info!(
                sender = %event.sender_id,
                pull_request = %pull_request,
                "processing pull request"
            );
            self.clock.sleep(self.pacing).await;

            let outcome = self.approvals.approve(pull_request).await;
            if outcome.success {
                approved += 1;
            } else {
                failed += 1;
            }
            self.acks
                .acknowledge(&event.channel_id, &event.ts, &outcome, decision.identity)
                .await;
        }

        Disposition::Processed { approved, failed }
    }
}

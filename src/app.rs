//! Shared application state handed to transports.

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::GlobalConfig;
use crate::dedup::DedupCache;
use crate::extract::PrUrlExtractor;
use crate::github::{ApprovalApi, ApprovalClient};
use crate::processor::{MessageProcessor, ProcessorParts};
use crate::routing::RoutingPolicy;
use crate::slack::reactions::{AckDispatcher, ReactionApi};
use crate::Result;

/// Remote collaborators supplied at startup (or by tests).
pub struct Collaborators {
    /// Approval API.
    pub approvals: Arc<dyn ApprovalApi>,
    /// Reactions posted as the bot.
    pub primary_reactor: Arc<dyn ReactionApi>,
    /// Reactions posted as the delegated user.
    pub delegated_reactor: Option<Arc<dyn ReactionApi>>,
    /// Pacing clock.
    pub clock: Arc<dyn Clock>,
}

/// State shared by the Socket Mode listener and the HTTP server.
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<GlobalConfig>,
    /// Message processor.
    pub processor: Arc<MessageProcessor>,
}

impl AppState {
    /// Wire a processor from `config` and `collaborators`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the URL extractor cannot be built.
    pub fn build(
        config: Arc<GlobalConfig>,
        bot_user_id: &str,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let processing = &config.processing;
        let processor = MessageProcessor::new(ProcessorParts {
            policy: RoutingPolicy::new(
                bot_user_id,
                config.slack.owner_user_id.clone(),
                config.slack.allowed_channel_id.clone(),
            ),
            dedup: Arc::new(DedupCache::new(
                processing.dedup_capacity,
                processing.dedup_evict_batch,
            )),
            extractor: PrUrlExtractor::new(config.github.host.clone())?,
            approvals: ApprovalClient::new(collaborators.approvals),
            acks: AckDispatcher::new(
                collaborators.primary_reactor,
                collaborators.delegated_reactor,
            ),
            clock: collaborators.clock,
            pacing: processing.pacing(),
        });

        Ok(Self {
            config,
            processor: Arc::new(processor),
        })
    }
}

//! Pull request approval against the review host.
//!
//! [`ApprovalApi`] is the remote seam: one call records one approving
//! review. [`ApprovalClient`] wraps it so that callers always receive a
//! [`ProcessingOutcome`] instead of an error.

pub mod client;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{info, warn};

use crate::models::review::{ProcessingOutcome, ReviewRequestRef};
use crate::Result;

pub use client::GitHubClient;

/// Remote API able to record an approving review.
pub trait ApprovalApi: Send + Sync {
    /// Submit an `APPROVE` review without a body for `pull_request`.
    ///
    /// Implementations must not retry: one call, at most one review.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::GitHub`](crate::AppError::GitHub) on transport
    /// failures and non-success responses.
    fn create_approval<'a>(
        &'a self,
        pull_request: &'a ReviewRequestRef,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Error-capturing front for an [`ApprovalApi`].
#[derive(Clone)]
pub struct ApprovalClient {
    api: Arc<dyn ApprovalApi>,
}

impl ApprovalClient {
    /// Wrap `api`.
    #[must_use]
    pub fn new(api: Arc<dyn ApprovalApi>) -> Self {
        Self { api }
    }

    /// Approve `pull_request`, folding any failure into the outcome.
    pub async fn approve(&self, pull_request: &ReviewRequestRef) -> ProcessingOutcome {
        match self.api.create_approval(pull_request).await {
            Ok(()) => {
                info!(pull_request = %pull_request, "pull request approved");
                ProcessingOutcome::approved()
            }
            Err(err) => {
                warn!(pull_request = %pull_request, %err, "failed to approve pull request");
                ProcessingOutcome::failed(err.to_string())
            }
        }
    }
}

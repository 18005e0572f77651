//! Pull request reference and approval outcome.

use std::fmt::{Display, Formatter};

/// Identifies one pull request on the review host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewRequestRef {
    /// Organization or user owning the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number; always positive.
    pub number: u64,
}

impl ReviewRequestRef {
    /// Build a reference from its parts.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl Display for ReviewRequestRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Result of one approval attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOutcome {
    /// Whether the approving review was recorded.
    pub success: bool,
    /// Error message when `success` is false.
    pub error: Option<String>,
}

impl ProcessingOutcome {
    /// Successful approval.
    #[must_use]
    pub fn approved() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Failed approval carrying the error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

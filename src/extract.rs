//! Pull request URL extraction from free-form message text.

use std::collections::HashSet;

use regex::Regex;

use crate::models::review::ReviewRequestRef;
use crate::{AppError, Result};

/// Loose pattern used to locate candidate URLs anywhere in a message.
const CANDIDATE_PATTERN: &str = r"https?://[^/\s]+/[^/\s]+/[^/\s]+/pull/\d+";

/// Anchored pattern applied to each candidate before it is accepted.
const STRICT_PATTERN: &str = r"^https?://([^/\s]+)/([^/\s]+)/([^/\s]+)/pull/(\d+)$";

/// Finds pull request URLs for one review host.
#[derive(Debug, Clone)]
pub struct PrUrlExtractor {
    host: String,
    candidate: Regex,
    strict: Regex,
}

impl PrUrlExtractor {
    /// Build an extractor accepting URLs on `host` (e.g. `github.com`).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the URL patterns fail to compile.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|err| AppError::Config(format!("invalid url pattern: {err}")))
        };
        Ok(Self {
            host: host.into(),
            candidate: compile(CANDIDATE_PATTERN)?,
            strict: compile(STRICT_PATTERN)?,
        })
    }

    /// Extract the distinct pull requests referenced in `text`.
    ///
    /// Candidates are de-duplicated by exact URL text and returned in
    /// first-occurrence order. Candidates that fail [`Self::parse`] are
    /// dropped.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<ReviewRequestRef> {
        let mut seen = HashSet::new();
        self.candidate
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|url| seen.insert(*url))
            .filter_map(|url| self.parse(url))
            .collect()
    }

    /// Parse a single pull request URL.
    ///
    /// Returns `None` when the URL is not on the configured host or the
    /// pull request number is zero or out of range.
    #[must_use]
    pub fn parse(&self, url: &str) -> Option<ReviewRequestRef> {
        let caps = self.strict.captures(url)?;
        if !caps[1].eq_ignore_ascii_case(&self.host) {
            return None;
        }
        let number: u64 = caps[4].parse().ok().filter(|n| *n > 0)?;
        Some(ReviewRequestRef::new(&caps[2], &caps[3], number))
    }
}
